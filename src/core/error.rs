// Copyright 2022 ComposableFi
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Errors raised while querying and assembling proofs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote query failed (network, chain error, pruned height).
    #[error("Rpc client error: {0}")]
    RpcError(String),
    /// The query succeeded but the store holds no value at the key.
    #[error("{entity} not found at key {key}")]
    NotFound { entity: &'static str, key: String },
    /// Raw bytes could not be parsed into the expected structure.
    #[error("Failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
    /// A nested lookup failed while serving an outer query.
    #[error("Dependent query failed: {0}")]
    Dependency(Box<Error>),
    #[error("Invalid identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },
    /// A provable query came back without a proof.
    #[error("Proof response is empty for key {key}")]
    EmptyProof { key: String },
    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn decode(what: &'static str, reason: impl ToString) -> Self {
        Error::Decode {
            what,
            reason: reason.to_string(),
        }
    }

    /// Wraps the failure of a nested query.
    pub fn dependency(inner: Error) -> Self {
        Error::Dependency(Box::new(inner))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Self::Custom(error)
    }
}

impl From<prost::DecodeError> for Error {
    fn from(error: prost::DecodeError) -> Self {
        Self::decode("protobuf message", error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::decode("json payload", error)
    }
}
