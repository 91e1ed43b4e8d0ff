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
use crate::primitives::traits::{
    QueryHeight, StateQuerier, StoreQueryResponse, DEFAULT_QUERY_ROUTE,
};
use prost::Message;
use serde::Deserialize;
use std::str::FromStr;
use tendermint::{
    block::Height as TmHeight, merkle::proof::ProofOps,
};
use tendermint_proto::crypto::{ProofOp as RawProofOp, ProofOps as RawProofOps};
use tendermint_rpc::{Client, HttpClient, Url};

/// Reads IBC state from a cosmos chain through the Tendermint `abci_query` RPC.
#[derive(Clone)]
pub struct CosmosClient {
    /// Chain name
    pub name: String,
    /// Chain rpc client
    pub rpc_client: HttpClient,
    /// Chain rpc address
    pub rpc_url: Url,
    /// Chain Id
    pub chain_id: String,
    /// Store key queries are routed to
    pub store_key: String,
}

/// config options for [`CosmosClient`]
#[derive(Debug, Clone, Deserialize)]
pub struct CosmosClientConfig {
    /// Chain name
    pub name: String,
    /// rpc url for cosmos
    pub rpc_url: Url,
    /// Cosmos chain Id
    pub chain_id: String,
    /// Store key of the IBC module
    #[serde(default = "default_store_key")]
    pub store_key: String,
}

fn default_store_key() -> String {
    DEFAULT_QUERY_ROUTE.to_string()
}

impl CosmosClient {
    /// Initializes a [`CosmosClient`] given a [`CosmosClientConfig`]
    pub fn new(config: CosmosClientConfig) -> Result<Self, Error> {
        let rpc_client = HttpClient::new(config.rpc_url.clone())
            .map_err(|e| Error::RpcError(format!("{:?}", e)))?;
        if config.store_key.is_empty() || config.store_key.contains('/') {
            return Err(Error::from(format!(
                "Invalid store key {:?}",
                config.store_key
            )));
        }

        Ok(Self {
            name: config.name,
            rpc_client,
            rpc_url: config.rpc_url,
            chain_id: config.chain_id,
            store_key: config.store_key,
        })
    }

    /// The query route every IBC lookup on this chain goes through.
    pub fn query_route(&self) -> &str {
        &self.store_key
    }
}

/// Maps an `abci_query` result onto the transport response. An empty value means the key is
/// absent, whether or not the node attached a proof.
fn store_response(value: Vec<u8>, proof: Option<ProofOps>, height: u64) -> StoreQueryResponse {
    StoreQueryResponse {
        value: if value.is_empty() { None } else { Some(value) },
        proof: proof.map(encode_proof_ops),
        height,
    }
}

/// Re-encodes Tendermint proof operations as protobuf bytes.
fn encode_proof_ops(proof: ProofOps) -> Vec<u8> {
    RawProofOps {
        ops: proof
            .ops
            .into_iter()
            .map(|op| RawProofOp {
                r#type: op.field_type,
                key: op.key,
                data: op.data,
            })
            .collect(),
    }
    .encode_to_vec()
}

#[async_trait::async_trait]
impl StateQuerier for CosmosClient {
    fn name(&self) -> &str {
        &*self.name
    }

    async fn query_store(
        &self,
        path: &str,
        key: Vec<u8>,
        height: QueryHeight,
        prove: bool,
    ) -> Result<StoreQueryResponse, Error> {
        let path = String::from_str(path)
            .map_err(|e| Error::Custom(format!("failed to parse path: {}", e)))?;

        let height = match height {
            QueryHeight::Latest => None,
            QueryHeight::Specific(h) => Some(
                TmHeight::try_from(h)
                    .map_err(|e| Error::from(format!("Invalid height {}", e)))?,
            ),
        };

        // Use the Tendermint-rs RPC client to do the query.
        let response = self
            .rpc_client
            .abci_query(Some(path), key, height, prove)
            .await
            .map_err(|e| {
                Error::RpcError(format!(
                    "Failed to query chain {} with error {:?}",
                    self.name, e
                ))
            })?;

        if !response.code.is_ok() {
            // Fail with response log.
            return Err(Error::RpcError(format!(
                "Query failed with code {:?} and log {:?}",
                response.code, response.log
            )));
        }

        Ok(store_response(
            response.value,
            response.proof,
            response.height.value(),
        ))
    }
}
