use ibc_proof_query::core::logging;
use ibc_proof_query::testsuite::{
    setup::{
        init_transfer_channel, open_transfer_channel, put_channel, put_packet_commitment,
        setup_transfer_chain, transfer_data,
    },
    store::MemoryStore,
};
use ibc_proof_query::{
    key_channel, key_packet_commitment, query_channel, query_packet, ChannelId, Error, PacketData,
    PacketDataRegistry, PortId, QueryContext, QueryHeight, State, DEFAULT_QUERY_ROUTE,
};

fn transfer_channel() -> (PortId, ChannelId) {
    (PortId::transfer(), ChannelId::new(0))
}

#[tokio::test]
async fn query_channel_returns_open_channel_with_store_height() {
    logging::setup_logging();
    let mut store = setup_transfer_chain("chain-a");
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);
    let (port, chan) = transfer_channel();

    let res = query_channel(&ctx, &port, &chan, DEFAULT_QUERY_ROUTE, true)
        .await
        .unwrap();

    assert_eq!(res.channel.state, State::Open);
    assert_eq!(res.channel.counterparty.channel_id, Some(ChannelId::new(1)));
    assert_eq!(res.channel, open_transfer_channel(1));
    assert_eq!(res.id.port_id, port);
    assert_eq!(res.id.channel_id, chan);
    assert_eq!(res.proof_height, store.height());
    assert_eq!(
        res.proof,
        Some(MemoryStore::proof_for(&key_channel(&port, &chan), store.height(), true))
    );

    let queries = store.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].path, "store/ibc/key");
    assert_eq!(queries[0].key, key_channel(&port, &chan));
    assert_eq!(queries[0].height, QueryHeight::Latest);
    assert!(queries[0].prove);
}

#[tokio::test]
async fn query_channel_without_proof() {
    let store = setup_transfer_chain("chain-a");
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);
    let (port, chan) = transfer_channel();

    let res = query_channel(&ctx, &port, &chan, DEFAULT_QUERY_ROUTE, false)
        .await
        .unwrap();
    assert_eq!(res.proof, None);
    assert!(!store.queries()[0].prove);
}

#[tokio::test]
async fn query_channel_returns_init_channel_without_counterparty_channel() {
    let mut store = MemoryStore::new("chain-a");
    let (port, chan) = transfer_channel();
    put_channel(&mut store, &port, &chan, &init_transfer_channel());
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let res = query_channel(&ctx, &port, &chan, DEFAULT_QUERY_ROUTE, true)
        .await
        .unwrap();
    assert_eq!(res.channel.state, State::Init);
    assert_eq!(res.channel.counterparty.port_id, PortId::transfer());
    assert_eq!(res.channel.counterparty.channel_id, None);
    assert_eq!(res.channel, init_transfer_channel());
}

#[tokio::test]
async fn missing_channel_is_not_found() {
    let store = setup_transfer_chain("chain-a");
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_channel(
        &ctx,
        &PortId::transfer(),
        &ChannelId::new(9),
        DEFAULT_QUERY_ROUTE,
        true,
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found(), "{:?}", err);
}

#[tokio::test]
async fn truncated_channel_is_a_decode_error() {
    let mut store = MemoryStore::new("chain-a");
    let (port, chan) = transfer_channel();
    let bytes = open_transfer_channel(1).encode_length_prefixed();
    store.set(key_channel(&port, &chan), bytes[..bytes.len() - 3].to_vec());
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_channel(&ctx, &port, &chan, DEFAULT_QUERY_ROUTE, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{:?}", err);
}

#[tokio::test]
async fn transport_failures_are_propagated() {
    let mut store = setup_transfer_chain("chain-a");
    let (port, chan) = transfer_channel();
    store.fail_queries_for(key_channel(&port, &chan), "connection refused");
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_channel(&ctx, &port, &chan, DEFAULT_QUERY_ROUTE, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::RpcError(ref reason) if reason == "connection refused"));
}

#[tokio::test]
async fn provable_query_without_proof_is_rejected() {
    let mut store = setup_transfer_chain("chain-a");
    store.omit_proofs();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);
    let (port, chan) = transfer_channel();

    let err = query_channel(&ctx, &port, &chan, DEFAULT_QUERY_ROUTE, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyProof { .. }));
}

#[tokio::test]
async fn query_packet_assembles_packet_from_commitment_and_counterparty() {
    logging::setup_logging();
    let mut store = setup_transfer_chain("chain-a");
    let (port, chan) = transfer_channel();
    let data = transfer_data(100);
    put_packet_commitment(&mut store, &port, &chan, 5, &data).unwrap();
    let height = store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let res = query_packet(&ctx, &port, &chan, 5, 1_000, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap();

    assert_eq!(res.sequence, 5);
    assert_eq!(res.packet.sequence, 5);
    assert_eq!(res.packet.source_port.as_str(), "transfer");
    assert_eq!(res.packet.source_channel.as_str(), "channel-0");
    assert_eq!(res.packet.destination_port.as_str(), "transfer");
    assert_eq!(res.packet.destination_channel.as_str(), "channel-1");
    assert_eq!(res.packet.timeout_height, 1_000);
    assert_eq!(res.packet.data.get_bytes().unwrap(), data.get_bytes().unwrap());
    assert_eq!(res.proof_height, height + 1);
    // The proof is the one of the commitment read, not of the channel read.
    assert_eq!(
        res.proof,
        MemoryStore::proof_for(&key_packet_commitment(&port, &chan, 5), height, true)
    );
}

#[tokio::test]
async fn channel_lookup_is_pinned_to_packet_height() {
    let mut store = setup_transfer_chain("chain-a");
    let (port, chan) = transfer_channel();
    put_packet_commitment(&mut store, &port, &chan, 1, &transfer_data(10)).unwrap();
    let read_height = store.commit();
    put_channel(&mut store, &port, &chan, &open_transfer_channel(7));
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry).at_height(QueryHeight::Specific(read_height));

    let res = query_packet(&ctx, &port, &chan, 1, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap();
    assert_eq!(res.packet.destination_channel, ChannelId::new(1));
    assert_eq!(res.proof_height, read_height + 1);

    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].key, key_packet_commitment(&port, &chan, 1));
    assert_eq!(queries[1].key, key_channel(&port, &chan));
    assert_eq!(queries[1].height, QueryHeight::Specific(read_height));
    assert!(queries.iter().all(|q| q.prove));
}

#[tokio::test]
async fn latest_packet_read_pins_channel_to_observed_height() {
    let mut store = setup_transfer_chain("chain-a");
    let (port, chan) = transfer_channel();
    put_packet_commitment(&mut store, &port, &chan, 2, &transfer_data(10)).unwrap();
    let height = store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    query_packet(&ctx, &port, &chan, 2, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap();
    let queries = store.queries();
    assert_eq!(queries[0].height, QueryHeight::Latest);
    assert_eq!(queries[1].height, QueryHeight::Specific(height));
}

#[tokio::test]
async fn packet_query_fails_when_channel_is_missing() {
    let mut store = MemoryStore::new("chain-a");
    let (port, chan) = transfer_channel();
    put_packet_commitment(&mut store, &port, &chan, 5, &transfer_data(100)).unwrap();
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_packet(&ctx, &port, &chan, 5, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap_err();
    match err {
        Error::Dependency(inner) => assert!(inner.is_not_found(), "{:?}", inner),
        other => panic!("expected dependency error, got {:?}", other),
    }
}

#[tokio::test]
async fn packet_query_wraps_channel_transport_failure() {
    let mut store = setup_transfer_chain("chain-a");
    let (port, chan) = transfer_channel();
    put_packet_commitment(&mut store, &port, &chan, 3, &transfer_data(1)).unwrap();
    store.commit();
    store.fail_queries_for(key_channel(&port, &chan), "height pruned");
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_packet(&ctx, &port, &chan, 3, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Dependency(ref inner) if matches!(**inner, Error::RpcError(_))));
}

#[tokio::test]
async fn packet_on_init_channel_needs_counterparty_channel() {
    let mut store = MemoryStore::new("chain-a");
    let (port, chan) = transfer_channel();
    put_channel(&mut store, &port, &chan, &init_transfer_channel());
    put_packet_commitment(&mut store, &port, &chan, 1, &transfer_data(10)).unwrap();
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_packet(&ctx, &port, &chan, 1, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap_err();
    match err {
        Error::Dependency(inner) => assert!(
            matches!(*inner, Error::Decode { what: "counterparty channel id", .. }),
            "{:?}",
            inner
        ),
        other => panic!("expected dependency error, got {:?}", other),
    }
    assert_eq!(store.queries().len(), 2);
}

#[tokio::test]
async fn missing_commitment_aborts_before_channel_lookup() {
    let store = setup_transfer_chain("chain-a");
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);
    let (port, chan) = transfer_channel();

    let err = query_packet(&ctx, &port, &chan, 0, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{:?}", err);
    assert_eq!(store.queries().len(), 1);
}

#[tokio::test]
async fn unregistered_payload_kind_is_a_decode_error() {
    let mut store = setup_transfer_chain("chain-a");
    let (port, chan) = transfer_channel();
    store.set(
        key_packet_commitment(&port, &chan, 4),
        br#"{"type":"ibc/ica/Unknown","value":{}}"#.to_vec(),
    );
    store.commit();
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);

    let err = query_packet(&ctx, &port, &chan, 4, 0, DEFAULT_QUERY_ROUTE)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{:?}", err);
}

#[tokio::test]
async fn custom_query_route_selects_store() {
    let store = setup_transfer_chain("chain-a");
    let registry = PacketDataRegistry::default();
    let ctx = QueryContext::new(&store, &registry);
    let (port, chan) = transfer_channel();

    query_channel(&ctx, &port, &chan, "ibc-v2", false)
        .await
        .unwrap();
    assert_eq!(store.queries()[0].path, "store/ibc-v2/key");
}
