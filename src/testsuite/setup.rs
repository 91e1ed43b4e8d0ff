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

use super::store::MemoryStore;
use crate::core::{
    channel::{Channel, Counterparty, Order, State},
    error::Error,
    packets::types::{Coin, PacketData, TransferPacketData},
    path::{key_channel, key_packet_commitment, ChannelId, PortId},
};

/// A transfer channel in `INIT`: the counterparty has not assigned its channel id yet.
pub fn init_transfer_channel() -> Channel {
    Channel {
        state: State::Init,
        counterparty: Counterparty::new(PortId::transfer(), None),
        ..open_transfer_channel(0)
    }
}

/// An open, unordered transfer channel whose remote end is `transfer/channel-{counterparty}`.
pub fn open_transfer_channel(counterparty: u64) -> Channel {
    Channel {
        state: State::Open,
        ordering: Order::Unordered,
        counterparty: Counterparty::new(PortId::transfer(), Some(ChannelId::new(counterparty))),
        connection_hops: vec!["connection-0".to_string()],
        version: "ics20-1".to_string(),
    }
}

pub fn transfer_data(amount: u64) -> TransferPacketData {
    TransferPacketData {
        amount: vec![Coin {
            denom: "stake".to_string(),
            amount: amount.to_string(),
        }],
        sender: "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu".to_string(),
        receiver: "cosmos1zg69v7ys40x77y352eufp27daufrg4ncnjqz7q".to_string(),
        source: true,
    }
}

/// Stages the channel end in the pending block of `store`.
pub fn put_channel(
    store: &mut MemoryStore,
    port_id: &PortId,
    channel_id: &ChannelId,
    channel: &Channel,
) {
    store.set(key_channel(port_id, channel_id), channel.encode_length_prefixed());
}

/// Stages the commitment of `data` at `sequence` in the pending block of `store`.
pub fn put_packet_commitment(
    store: &mut MemoryStore,
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: u64,
    data: &dyn PacketData,
) -> Result<(), Error> {
    store.set(key_packet_commitment(port_id, channel_id, sequence), data.get_bytes()?);
    Ok(())
}

/// A chain with `transfer/channel-0` open towards `transfer/channel-1`, committed at height 1.
pub fn setup_transfer_chain(name: &str) -> MemoryStore {
    log::info!(target: "ibc-proof-query", "Seeding in-memory chain {}", name);
    let mut store = MemoryStore::new(name);
    put_channel(
        &mut store,
        &PortId::transfer(),
        &ChannelId::new(0),
        &open_transfer_channel(1),
    );
    store.commit();
    store
}
