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
use crate::core::path::{ChannelId, PortId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Debug, sync::Arc};

/// Capability shared by every application payload carried in a packet.
pub trait PacketData: Debug + Send + Sync {
    /// Envelope tag the payload is registered under, e.g. `ibc/transfer/PacketDataTransfer`
    fn kind(&self) -> &'static str;

    /// Stateless checks on the decoded payload.
    fn validate_basic(&self) -> Result<(), Error>;

    /// Canonical bytes the packet commitment is computed over.
    fn get_bytes(&self) -> Result<Vec<u8>, Error>;
}

/// Wire envelope of a packet payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PacketDataEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
}

impl PacketDataEnvelope {
    pub fn new<T: Serialize>(kind: &str, value: &T) -> Result<Self, Error> {
        Ok(Self {
            kind: kind.to_string(),
            value: serde_json::to_value(value)?,
        })
    }

    /// Keys of a `serde_json::Value` map are sorted, so the output is canonical.
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

type DecodeFn = fn(Value) -> Result<Arc<dyn PacketData>, Error>;

/// Decoders for the payload kinds applications have registered.
#[derive(Clone)]
pub struct PacketDataRegistry {
    decoders: BTreeMap<String, DecodeFn>,
}

impl PacketDataRegistry {
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, kind: &str, decode: DecodeFn) {
        self.decoders.insert(kind.to_string(), decode);
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }

    /// Decodes the JSON envelope stored at a packet commitment key into the registered
    /// payload kind. Unknown kinds are an error.
    pub fn decode(&self, bytes: &[u8]) -> Result<Arc<dyn PacketData>, Error> {
        let envelope: PacketDataEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| Error::decode("packet data envelope", e))?;
        let decode = self.decoders.get(&envelope.kind).ok_or_else(|| {
            Error::decode(
                "packet data",
                format!("no decoder registered for kind {:?}", envelope.kind),
            )
        })?;
        let data = decode(envelope.value)?;
        data.validate_basic()?;
        Ok(data)
    }
}

impl Default for PacketDataRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(TransferPacketData::KIND, TransferPacketData::decode_value);
        registry
    }
}

impl Debug for PacketDataRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// Fungible token transfer payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPacketData {
    pub amount: Vec<Coin>,
    pub sender: String,
    pub receiver: String,
    pub source: bool,
}

impl TransferPacketData {
    pub const KIND: &'static str = "ibc/transfer/PacketDataTransfer";

    fn decode_value(value: Value) -> Result<Arc<dyn PacketData>, Error> {
        let data: TransferPacketData = serde_json::from_value(value)
            .map_err(|e| Error::decode("transfer packet data", e))?;
        Ok(Arc::new(data))
    }
}

impl PacketData for TransferPacketData {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn validate_basic(&self) -> Result<(), Error> {
        if self.sender.trim().is_empty() {
            return Err(Error::decode("transfer packet data", "missing sender"));
        }
        if self.receiver.trim().is_empty() {
            return Err(Error::decode("transfer packet data", "missing receiver"));
        }
        if self.amount.is_empty() {
            return Err(Error::decode("transfer packet data", "empty amount"));
        }
        for coin in &self.amount {
            if coin.denom.is_empty() || coin.amount.parse::<u128>().map_or(true, |a| a == 0) {
                return Err(Error::decode(
                    "transfer packet data",
                    format!("invalid coin {}{}", coin.amount, coin.denom),
                ));
            }
        }
        Ok(())
    }

    fn get_bytes(&self) -> Result<Vec<u8>, Error> {
        PacketDataEnvelope::new(Self::KIND, self)?.to_vec()
    }
}

/// A packet reconstructed from its commitment and the channel's current counterparty.
#[derive(Clone, Debug)]
pub struct Packet {
    pub data: Arc<dyn PacketData>,
    pub sequence: u64,
    pub source_port: PortId,
    pub source_channel: ChannelId,
    pub destination_port: PortId,
    pub destination_channel: ChannelId,
    pub timeout_height: u64,
}
