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

use super::error::Error;
use super::path::{ChannelId, PortId};
use ibc_proto::ibc::core::channel::v1::{Channel as RawChannel, Counterparty as RawCounterparty};
use prost::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Init = 1,
    TryOpen = 2,
    Open = 3,
    Closed = 4,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    // The zero value (uninitialized) never describes a stored channel end.
    pub fn from_i32(s: i32) -> Result<Self, Error> {
        match s {
            1 => Ok(Self::Init),
            2 => Ok(Self::TryOpen),
            3 => Ok(Self::Open),
            4 => Ok(Self::Closed),
            _ => Err(Error::decode(
                "channel state",
                format!("unknown discriminant {}, must be one of 1, 2, 3, 4", s),
            )),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Unordered = 1,
    Ordered = 2,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }

    pub fn from_i32(nr: i32) -> Result<Self, Error> {
        match nr {
            1 => Ok(Self::Unordered),
            2 => Ok(Self::Ordered),
            _ => Err(Error::decode(
                "channel ordering",
                format!("unknown discriminant {}, must be one of 1, 2", nr),
            )),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The remote end of a channel. The channel id is unset until the counterparty chain has
/// opened its end, e.g. for a channel still in `INIT`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.channel_id {
            Some(channel_id) => write!(f, "{}/{}", self.port_id, channel_id),
            None => write!(f, "{}/<unset>", self.port_id),
        }
    }
}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = Error;

    fn try_from(raw: RawCounterparty) -> Result<Self, Self::Error> {
        let channel_id = if raw.channel_id.is_empty() {
            None
        } else {
            Some(
                raw.channel_id
                    .parse()
                    .map_err(|e| Error::decode("counterparty channel id", e))?,
            )
        };
        Ok(Counterparty::new(
            raw.port_id
                .parse()
                .map_err(|e| Error::decode("counterparty port id", e))?,
            channel_id,
        ))
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(value: Counterparty) -> Self {
        RawCounterparty {
            port_id: value.port_id.into(),
            channel_id: value.channel_id.map(String::from).unwrap_or_default(),
        }
    }
}

/// Snapshot of a channel end as stored on chain at some height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub state: State,
    pub ordering: Order,
    /// Channel end on the remote chain
    pub counterparty: Counterparty,
    pub connection_hops: Vec<String>,
    pub version: String,
}

impl Channel {
    /// Decodes a varint length-prefixed protobuf channel end. The prefix must cover the
    /// whole buffer; truncated or padded values are rejected.
    pub fn decode_length_prefixed(bytes: &[u8]) -> Result<Self, Error> {
        let mut buf = bytes;
        let len = prost::encoding::decode_varint(&mut buf)
            .map_err(|e| Error::decode("channel length prefix", e))?;
        if len != buf.len() as u64 {
            return Err(Error::decode(
                "channel",
                format!(
                    "length prefix {} does not match payload of {} bytes",
                    len,
                    buf.len()
                ),
            ));
        }
        let raw = RawChannel::decode(buf).map_err(|e| Error::decode("channel", e))?;
        Self::try_from(raw)
    }

    pub fn encode_length_prefixed(&self) -> Vec<u8> {
        RawChannel::from(self.clone()).encode_length_delimited_to_vec()
    }
}

impl TryFrom<RawChannel> for Channel {
    type Error = Error;

    fn try_from(value: RawChannel) -> Result<Self, Self::Error> {
        let state = State::from_i32(value.state)?;
        let ordering = Order::from_i32(value.ordering)?;
        let counterparty: Counterparty = value
            .counterparty
            .ok_or_else(|| Error::decode("channel", "missing counterparty"))?
            .try_into()?;
        if value.connection_hops.iter().any(|hop| hop.is_empty()) {
            return Err(Error::decode("channel", "empty connection hop"));
        }
        Ok(Channel {
            state,
            ordering,
            counterparty,
            connection_hops: value.connection_hops,
            version: value.version,
        })
    }
}

impl From<Channel> for RawChannel {
    fn from(value: Channel) -> Self {
        let mut raw = RawChannel::default();
        raw.state = value.state as i32;
        raw.ordering = value.ordering as i32;
        raw.counterparty = Some(value.counterparty.into());
        raw.connection_hops = value.connection_hops;
        raw.version = value.version;
        raw
    }
}
