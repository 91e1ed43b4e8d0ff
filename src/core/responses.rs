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

use super::channel::Channel;
use super::error::Error;
use super::packets::types::Packet;
use super::path::ChannelIdentifier;
use serde::Serialize;

/// Distance between the height a value was read at and the height a counterparty light
/// client verifies its proof against. The app hash of the state at height `h` is only
/// committed in the header of block `h + 1`.
pub const PROOF_HEIGHT_OFFSET: u64 = 1;

/// Height to submit alongside a proof obtained from a read at `query_height`.
pub fn proof_height(query_height: u64) -> Result<u64, Error> {
    query_height
        .checked_add(PROOF_HEIGHT_OFFSET)
        .ok_or_else(|| Error::Custom(format!("proof height overflows past {}", query_height)))
}

/// A channel end with the proof and height of the read that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChannelResponse {
    pub id: ChannelIdentifier,
    pub channel: Channel,
    /// Absent when the query was not provable
    pub proof: Option<Vec<u8>>,
    pub proof_height: u64,
}

impl ChannelResponse {
    pub fn new(
        id: ChannelIdentifier,
        channel: Channel,
        proof: Option<Vec<u8>>,
        height: u64,
    ) -> Self {
        Self {
            id,
            channel,
            proof,
            proof_height: height,
        }
    }
}

/// A packet with the commitment proof relayers submit as evidence.
#[derive(Clone, Debug)]
pub struct PacketResponse {
    /// Source channel end
    pub id: ChannelIdentifier,
    pub sequence: u64,
    pub packet: Packet,
    pub proof: Vec<u8>,
    pub proof_height: u64,
}

impl PacketResponse {
    pub fn new(
        id: ChannelIdentifier,
        sequence: u64,
        packet: Packet,
        proof: Vec<u8>,
        proof_height: u64,
    ) -> Self {
        Self {
            id,
            sequence,
            packet,
            proof,
            proof_height,
        }
    }
}
