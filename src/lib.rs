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

//! Retrieval of IBC channel ends and packet commitments together with the proofs and
//! heights relayers submit to a counterparty chain.

pub mod core;
pub mod cosmos;
pub mod primitives;
pub mod testsuite;

pub use crate::core::{
    channel::{Channel, Counterparty, Order, State},
    context::QueryContext,
    error::Error,
    packets::types::{Packet, PacketData, PacketDataRegistry, TransferPacketData},
    path::{key_channel, key_packet_commitment, ChannelId, ChannelIdentifier, PortId},
    responses::{proof_height, ChannelResponse, PacketResponse, PROOF_HEIGHT_OFFSET},
};
pub use crate::primitives::{
    funcs::{query_channel, query_packet},
    traits::{QueryHeight, StateQuerier, StoreQueryResponse, DEFAULT_QUERY_ROUTE},
};
