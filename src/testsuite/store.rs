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
use crate::primitives::traits::{QueryHeight, StateQuerier, StoreQueryResponse};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A query as observed by [`MemoryStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedQuery {
    pub path: String,
    pub key: Vec<u8>,
    pub height: QueryHeight,
    pub prove: bool,
}

/// Versioned in-memory key space standing in for a chain's state store. Writes land in the
/// block being built and become readable once [`MemoryStore::commit`] is called.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    versions: BTreeMap<Vec<u8>, BTreeMap<u64, Option<Vec<u8>>>>,
    height: u64,
    failing_keys: BTreeMap<Vec<u8>, String>,
    omit_proofs: bool,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl MemoryStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Latest committed height.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        let pending = self.height + 1;
        self.versions.entry(key).or_default().insert(pending, Some(value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        let pending = self.height + 1;
        self.versions.entry(key).or_default().insert(pending, None);
    }

    /// Seals the pending block and returns its height.
    pub fn commit(&mut self) -> u64 {
        self.height += 1;
        self.height
    }

    /// Queries for `key` fail with a transport error carrying `reason`.
    pub fn fail_queries_for(&mut self, key: Vec<u8>, reason: &str) {
        self.failing_keys.insert(key, reason.to_string());
    }

    /// Provable queries come back without a proof.
    pub fn omit_proofs(&mut self) {
        self.omit_proofs = true;
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    /// Proof handed out for a read of `key` at `height`.
    pub fn proof_for(key: &[u8], height: u64, exists: bool) -> Vec<u8> {
        let kind = if exists { "exist" } else { "nonexist" };
        format!("{}:{}:{}", kind, height, hex::encode(key)).into_bytes()
    }

    fn value_at(&self, key: &[u8], height: u64) -> Option<Vec<u8>> {
        self.versions
            .get(key)?
            .range(..=height)
            .next_back()
            .and_then(|(_, value)| value.clone())
    }
}

#[async_trait::async_trait]
impl StateQuerier for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_store(
        &self,
        path: &str,
        key: Vec<u8>,
        height: QueryHeight,
        prove: bool,
    ) -> Result<StoreQueryResponse, Error> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(RecordedQuery {
                path: path.to_string(),
                key: key.clone(),
                height,
                prove,
            });
        }
        if let Some(reason) = self.failing_keys.get(&key) {
            return Err(Error::RpcError(reason.clone()));
        }
        let height = match height {
            QueryHeight::Latest => self.height,
            QueryHeight::Specific(h) if h <= self.height => h,
            QueryHeight::Specific(h) => {
                return Err(Error::RpcError(format!(
                    "height {} is ahead of latest height {}",
                    h, self.height
                )))
            }
        };
        let value = self.value_at(&key, height);
        let proof = if prove && !self.omit_proofs {
            Some(Self::proof_for(&key, height, value.is_some()))
        } else {
            None
        };
        Ok(StoreQueryResponse {
            value,
            proof,
            height,
        })
    }
}
