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

use super::traits::{store_path, QueryHeight, StateQuerier};
use crate::core::{
    channel::Channel,
    context::QueryContext,
    error::Error,
    packets::types::Packet,
    path::{key_channel, key_packet_commitment, ChannelId, ChannelIdentifier, PortId},
    responses::{proof_height, ChannelResponse, PacketResponse},
};

/// Queries the channel end stored for `(port_id, channel_id)` at the context height.
/// The response height is the height the store reports for the read.
pub async fn query_channel<Q>(
    ctx: &QueryContext<'_, Q>,
    port_id: &PortId,
    channel_id: &ChannelId,
    query_route: &str,
    prove: bool,
) -> Result<ChannelResponse, Error>
where
    Q: StateQuerier + ?Sized,
{
    let key = key_channel(port_id, channel_id);
    log::debug!(
        target: "ibc-proof-query",
        "Querying channel {}/{} on {} at height {}",
        port_id,
        channel_id,
        ctx.querier.name(),
        ctx.height
    );
    let res = ctx
        .querier
        .query_store(&store_path(query_route), key.clone(), ctx.height, prove)
        .await?;

    let value = match res.value {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(Error::NotFound {
                entity: "channel",
                key: String::from_utf8_lossy(&key).into_owned(),
            })
        }
    };
    if prove && res.proof.is_none() {
        return Err(Error::EmptyProof {
            key: hex::encode(&key),
        });
    }

    let channel = Channel::decode_length_prefixed(&value)?;
    log::info!(
        target: "ibc-proof-query",
        "Channel {}/{} is {} with counterparty {} at height {}",
        port_id,
        channel_id,
        channel.state,
        channel.counterparty,
        res.height
    );
    Ok(ChannelResponse::new(
        ChannelIdentifier::new(port_id.clone(), channel_id.clone()),
        channel,
        res.proof,
        res.height,
    ))
}

/// Queries the packet committed at `sequence` on `(port_id, channel_id)` together with its
/// commitment proof. The destination of the packet is taken from the counterparty of the
/// channel end read at the same height as the commitment.
pub async fn query_packet<Q>(
    ctx: &QueryContext<'_, Q>,
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: u64,
    timeout: u64,
    query_route: &str,
) -> Result<PacketResponse, Error>
where
    Q: StateQuerier + ?Sized,
{
    let key = key_packet_commitment(port_id, channel_id, sequence);
    log::debug!(
        target: "ibc-proof-query",
        "Querying packet commitment {} on {} at height {}",
        hex::encode(&key),
        ctx.querier.name(),
        ctx.height
    );
    // Packet proofs are relay evidence, so they are always requested.
    let res = ctx
        .querier
        .query_store(&store_path(query_route), key.clone(), ctx.height, true)
        .await?;

    let value = match res.value {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(Error::NotFound {
                entity: "packet commitment",
                key: String::from_utf8_lossy(&key).into_owned(),
            })
        }
    };
    let proof = res.proof.ok_or_else(|| Error::EmptyProof {
        key: hex::encode(&key),
    })?;

    let pinned = ctx.at_height(QueryHeight::Specific(res.height));
    let channel = query_channel(&pinned, port_id, channel_id, query_route, true)
        .await
        .map_err(Error::dependency)?;
    let counterparty = channel.channel.counterparty;
    let destination_channel = counterparty.channel_id.ok_or_else(|| {
        Error::dependency(Error::decode(
            "counterparty channel id",
            format!("unset on channel {}/{}", port_id, channel_id),
        ))
    })?;

    let data = ctx.registry.decode(&value)?;
    let packet = Packet {
        data,
        sequence,
        source_port: port_id.clone(),
        source_channel: channel_id.clone(),
        destination_port: counterparty.port_id,
        destination_channel,
        timeout_height: timeout,
    };

    log::info!(
        target: "ibc-proof-query",
        "Packet {} on {}/{} destined for {}/{} read at height {}",
        sequence,
        port_id,
        channel_id,
        packet.destination_port,
        packet.destination_channel,
        res.height
    );
    Ok(PacketResponse::new(
        ChannelIdentifier::new(port_id.clone(), channel_id.clone()),
        sequence,
        packet,
        proof,
        proof_height(res.height)?,
    ))
}
