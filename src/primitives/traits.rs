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

use crate::core::error::Error;
use std::fmt;

/// Store key of the IBC module; `store/{route}/key` addresses its raw key space.
pub const DEFAULT_QUERY_ROUTE: &str = "ibc";

/// Height a store query is executed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryHeight {
    /// Latest committed height of the queried node
    Latest,
    Specific(u64),
}

impl fmt::Display for QueryHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Specific(h) => write!(f, "{}", h),
        }
    }
}

/// Raw result of a store query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreQueryResponse {
    /// `None` when the store holds nothing at the key
    pub value: Option<Vec<u8>>,
    /// Membership or non-membership proof, present when requested
    pub proof: Option<Vec<u8>>,
    /// Height the read was performed at
    pub height: u64,
}

/// Provides provable key lookups against a chain's state store.
#[async_trait::async_trait]
pub trait StateQuerier: Send + Sync {
    /// Name of the queried chain, used in logs.
    fn name(&self) -> &str;

    /// Look up `key` in the store addressed by `path` at `height`. With `prove` set the
    /// response must carry a proof of presence of the value, or of absence of any value,
    /// valid at the returned height. Transport failures are returned as
    /// [`Error::RpcError`].
    async fn query_store(
        &self,
        path: &str,
        key: Vec<u8>,
        height: QueryHeight,
        prove: bool,
    ) -> Result<StoreQueryResponse, Error>;
}

/// Path of the raw key space of the store named by `query_route`.
pub fn store_path(query_route: &str) -> String {
    format!("store/{}/key", query_route)
}
