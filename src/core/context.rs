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

use super::packets::types::PacketDataRegistry;
use crate::primitives::traits::{QueryHeight, StateQuerier};

/// Everything a query needs to know about the chain it reads from.
pub struct QueryContext<'a, Q: StateQuerier + ?Sized> {
    pub querier: &'a Q,
    pub height: QueryHeight,
    pub registry: &'a PacketDataRegistry,
}

impl<'a, Q: StateQuerier + ?Sized> QueryContext<'a, Q> {
    pub fn new(querier: &'a Q, registry: &'a PacketDataRegistry) -> Self {
        Self {
            querier,
            height: QueryHeight::Latest,
            registry,
        }
    }

    /// Same chain and decoders, reads pinned to `height`.
    pub fn at_height(&self, height: QueryHeight) -> Self {
        Self {
            querier: self.querier,
            height,
            registry: self.registry,
        }
    }
}
