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

//! Commitment paths under which channel ends and packet commitments are stored.

use super::error::Error;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const CHANNEL_END_PREFIX: &str = "channelEnds";
pub const PACKET_COMMITMENT_PREFIX: &str = "commitments";
pub const PORT_PREFIX: &str = "ports";
pub const CHANNEL_PREFIX: &str = "channels";
pub const SEQUENCE_PREFIX: &str = "sequences";

const PORT_ID_MAX_LEN: usize = 128;
const PORT_ID_MIN_LEN: usize = 2;
const CHANNEL_ID_MAX_LEN: usize = 64;
const CHANNEL_ID_MIN_LEN: usize = 1;
const ALLOWED_SPECIAL_CHARS: [char; 9] = ['.', '_', '+', '-', '#', '[', ']', '<', '>'];

/// Checks an identifier against the host identifier rules. The separator `/` is never
/// accepted, which keeps every key built from validated identifiers unambiguous.
fn validate_identifier(id: &str, min: usize, max: usize) -> Result<(), Error> {
    let invalid = |reason: String| Error::InvalidIdentifier {
        id: id.to_string(),
        reason,
    };
    if id.is_empty() {
        return Err(invalid("identifier cannot be empty".to_string()));
    }
    if id.len() < min || id.len() > max {
        return Err(invalid(format!(
            "length {} must be between {} and {}",
            id.len(),
            min,
            max
        )));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || ALLOWED_SPECIAL_CHARS.contains(c)))
    {
        return Err(invalid(format!("contains invalid character {:?}", c)));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortId(String);

impl PortId {
    pub fn transfer() -> Self {
        Self("transfer".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PortId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier(s, PORT_ID_MIN_LEN, PORT_ID_MAX_LEN)?;
        Ok(Self(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Identifier in the `channel-{n}` form assigned by the channel handshake.
    pub fn new(counter: u64) -> Self {
        Self(format!("channel-{}", counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ChannelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_identifier(s, CHANNEL_ID_MIN_LEN, CHANNEL_ID_MAX_LEN)?;
        Ok(Self(s.to_string()))
    }
}

macro_rules! impl_identifier_conversions {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> Self {
                id.0
            }
        }
    };
}

impl_identifier_conversions!(PortId);
impl_identifier_conversions!(ChannelId);

/// A channel endpoint on one chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelIdentifier {
    pub port_id: PortId,
    pub channel_id: ChannelId,
}

impl ChannelIdentifier {
    pub fn new(port_id: PortId, channel_id: ChannelId) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }
}

impl fmt::Display for ChannelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port_id, self.channel_id)
    }
}

/// Key of the channel end stored for `(port_id, channel_id)`.
pub fn key_channel(port_id: &PortId, channel_id: &ChannelId) -> Vec<u8> {
    format!(
        "{}/{}/{}/{}/{}",
        CHANNEL_END_PREFIX, PORT_PREFIX, port_id, CHANNEL_PREFIX, channel_id
    )
    .into_bytes()
}

/// Key of the packet commitment stored for `(port_id, channel_id, sequence)`.
pub fn key_packet_commitment(port_id: &PortId, channel_id: &ChannelId, sequence: u64) -> Vec<u8> {
    format!(
        "{}/{}/{}/{}/{}/{}/{}",
        PACKET_COMMITMENT_PREFIX,
        PORT_PREFIX,
        port_id,
        CHANNEL_PREFIX,
        channel_id,
        SEQUENCE_PREFIX,
        sequence
    )
    .into_bytes()
}
