//! # Subscription Flows
//!
//! Event delivery over the dev node's broadcast feed: observers see the
//! events their transactions emit, cancellation stops delivery, and
//! independent subscriptions do not interfere.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use elara_sdk::{
        names, Abi, Address, Bytes, CallOptions, ClientConfig, DevNode, ElaraClient, EventFilter,
        FrameworkApi, Hash, StaticWallet, SubId,
    };

    const FRAMEWORK_ABI: &str = r#"[
        {"name": "createSubId", "type": "function",
         "inputs": [{"name": "dataHash", "type": "bytes32"}]},
        {"name": "deployEmbeddedFramework", "type": "function",
         "inputs": [{"name": "bytecode", "type": "bytes"}]}
    ]"#;

    async fn connected() -> (Arc<DevNode>, ElaraClient<DevNode>) {
        let node = DevNode::connect(&ClientConfig::for_testing()).expect("dev node");
        let client = ElaraClient::new(
            ClientConfig::for_testing(),
            Abi::from_json(FRAMEWORK_ABI).expect("valid ABI"),
            node.clone(),
        )
        .with_wallet(Arc::new(StaticWallet::new(vec![Address::new([0xAA; 20])])));
        assert!(client.connect_wallet().await);
        (node, client)
    }

    async fn create(client: &ElaraClient<DevNode>) -> SubId {
        let fee = client.get_sub_id_fee().await.unwrap();
        client
            .create_sub_id(Hash::new([0xde; 32]), &CallOptions::with_fee(fee))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_observer_sees_created_sub_id() {
        let (_node, client) = connected().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let sub = client.subscribe_to_event(
            names::SUB_ID_CREATED,
            Box::new(move |event| {
                let _ = tx.send(event);
            }),
        );

        let sub_id = create(&client).await;

        let event = timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timeout waiting for event")
            .expect("event");
        assert_eq!(event.name, names::SUB_ID_CREATED);
        assert_eq!(
            event.arg(names::ARG_SUB_ID).and_then(|v| v.as_uint()),
            Some(sub_id.raw())
        );
        sub.cancel();
    }

    #[tokio::test]
    async fn test_cancelled_subscription_stops_delivering() {
        let (_node, client) = connected().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let sub = client.subscribe_to_event(
            names::SUB_ID_CREATED,
            Box::new(move |event| {
                let _ = tx.send(event);
            }),
        );
        sub.cancel();
        while sub.is_active() {
            tokio::task::yield_now().await;
        }

        create(&client).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscriptions_filter_independently() {
        let (_node, client) = connected().await;
        let (created_tx, mut created_rx) = mpsc::unbounded_channel();
        let (embedded_tx, mut embedded_rx) = mpsc::unbounded_channel();

        let _created = client.subscribe_to_event(
            names::SUB_ID_CREATED,
            Box::new(move |event| {
                let _ = created_tx.send(event);
            }),
        );
        let _embedded = client.subscribe_to_event(
            names::EMBEDDED_FRAMEWORK_CREATED,
            Box::new(move |event| {
                let _ = embedded_tx.send(event);
            }),
        );

        create(&client).await;
        client
            .deploy_embedded_framework(Bytes::from_slice(&[0x60]), &CallOptions::default())
            .await
            .unwrap();

        let created = timeout(Duration::from_millis(500), created_rx.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(created.name, names::SUB_ID_CREATED);

        let embedded = timeout(Duration::from_millis(500), embedded_rx.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(embedded.name, names::EMBEDDED_FRAMEWORK_CREATED);

        // Neither queue received the other's event.
        assert!(created_rx.try_recv().is_err());
        assert!(embedded_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_event_stream_pull_consumption() {
        use tokio_stream::StreamExt;

        let (_node, client) = connected().await;
        let mut stream = client.event_stream(EventFilter::named(names::SUB_ID_CREATED));

        let sub_id = create(&client).await;

        let event = timeout(Duration::from_millis(500), stream.next())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(
            event.arg(names::ARG_SUB_ID).and_then(|v| v.as_uint()),
            Some(sub_id.raw())
        );
    }
}
