//! # Sub-ID Lifecycle Flows
//!
//! End-to-end flows over the dev node transport: mint a sub-ID, inspect
//! the registry, deploy logic, invoke it and extract the typed result.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use elara_sdk::{
        Abi, Address, Bytes, CallOptions, ClientConfig, DevNode, ElaraClient, FrameworkApi, Hash,
        RustBindingGenerator, SdkError, StaticWallet, SubId, Value, U256,
    };

    /// Framework ABI including the embedded-framework capability.
    const VERSIONED_ABI: &str = r#"[
        {"name": "createSubId", "type": "function",
         "inputs": [{"name": "dataHash", "type": "bytes32"}]},
        {"name": "deploySubId", "type": "function",
         "inputs": [{"name": "subId", "type": "uint256"},
                    {"name": "bytecode", "type": "bytes"}]},
        {"name": "deployEmbeddedFramework", "type": "function",
         "inputs": [{"name": "bytecode", "type": "bytes"}]},
        {"name": "SubIdCreated", "type": "event",
         "inputs": [{"name": "subId", "type": "uint256"}]},
        {"name": "EmbeddedFrameworkCreated", "type": "event",
         "inputs": [{"name": "deployedContract", "type": "address"}]}
    ]"#;

    /// ABI the dev node registers for deployed logic contracts.
    const LOGIC_ABI: &str = r#"[
        {"name": "ping", "type": "function",
         "outputs": [{"name": "value", "type": "uint256"}]},
        {"name": "echo", "type": "function",
         "inputs": [{"name": "data", "type": "bytes"}],
         "outputs": [{"name": "value", "type": "bytes"}]}
    ]"#;

    const OWNER: Address = Address::new([0xAA; 20]);

    fn client(node: Arc<DevNode>) -> ElaraClient<DevNode> {
        ElaraClient::new(
            ClientConfig::for_testing(),
            Abi::from_json(VERSIONED_ABI).expect("valid ABI"),
            node,
        )
        .with_wallet(Arc::new(StaticWallet::new(vec![OWNER])))
    }

    async fn connected() -> (Arc<DevNode>, ElaraClient<DevNode>) {
        let node = DevNode::connect(&ClientConfig::for_testing()).expect("dev node");
        let client = client(node.clone());
        assert!(client.connect_wallet().await);
        (node, client)
    }

    async fn create(client: &ElaraClient<DevNode>) -> SubId {
        let fee = client.get_sub_id_fee().await.expect("fee query");
        client
            .create_sub_id(Hash::new([0xde; 32]), &CallOptions::with_fee(fee))
            .await
            .expect("creation")
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (_node, client) = connected().await;

        // Mint.
        let sub_id = create(&client).await;

        // Inspect: owned by the connected account, nothing deployed yet.
        let info = client.get_sub_id_info(sub_id).await.unwrap();
        assert_eq!(info.owner, OWNER);
        assert!(!info.has_deployment());

        // Deploy logic under the sub-ID.
        client
            .deploy_sub_id_logic(sub_id, Bytes::from_slice(&[0x60, 0x60, 0x60]))
            .await
            .unwrap();

        let info = client.get_sub_id_info(sub_id).await.unwrap();
        let deployed = info.deployed_contract.expect("deployed address");
        assert!(!deployed.is_zero());

        // Invoke the deployed logic and extract the typed return value.
        let logic_abi = Abi::from_json(LOGIC_ABI).unwrap();
        let result = client
            .call_sub_id_function(sub_id, "ping", vec![], &logic_abi)
            .await
            .unwrap();
        assert_eq!(result.as_uint(), Some(U256::one()));

        // Echoed arguments come back unchanged.
        let payload = Value::Bytes(Bytes::from_slice(b"hello"));
        let echoed = client
            .call_sub_id_function(sub_id, "echo", vec![payload.clone()], &logic_abi)
            .await
            .unwrap();
        assert_eq!(echoed, payload);
    }

    #[tokio::test]
    async fn test_sub_ids_are_unique() {
        let (_node, client) = connected().await;
        let first = create(&client).await;
        let second = create(&client).await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_requires_connected_wallet() {
        let node = DevNode::connect(&ClientConfig::for_testing()).unwrap();
        let client = client(node);
        // No connect_wallet call.
        let err = client
            .create_sub_id(Hash::ZERO, &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::NoActiveAccount));
    }

    #[tokio::test]
    async fn test_insufficient_fee_aborts_before_submission() {
        let (_node, client) = connected().await;
        let err = client
            .create_sub_id(Hash::ZERO, &CallOptions::default())
            .await
            .unwrap_err();
        // The dev node rejects at the estimation stage; nothing was minted.
        assert!(matches!(err, SdkError::ContractCall { .. }));

        let lookup = client.get_sub_id_info(SubId::from(1)).await.unwrap_err();
        assert!(matches!(lookup, SdkError::ContractCall { .. }));
    }

    #[tokio::test]
    async fn test_creation_limit_enforced() {
        let (node, client) = connected().await;
        node.set_limit(2);

        create(&client).await;
        create(&client).await;

        let fee = client.get_sub_id_fee().await.unwrap();
        let err = client
            .create_sub_id(Hash::ZERO, &CallOptions::with_fee(fee))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[tokio::test]
    async fn test_unknown_sub_id_query_propagates() {
        let (_node, client) = connected().await;
        let err = client.get_sub_id_info(SubId::from(404)).await.unwrap_err();
        assert!(matches!(err, SdkError::ContractCall { .. }));
    }

    #[tokio::test]
    async fn test_invoke_without_deployment_fails() {
        let (_node, client) = connected().await;
        let sub_id = create(&client).await;

        let logic_abi = Abi::from_json(LOGIC_ABI).unwrap();
        let err = client
            .call_sub_id_function(sub_id, "ping", vec![], &logic_abi)
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::NotDeployed(_)));
    }

    #[tokio::test]
    async fn test_embedded_framework_deployment() {
        let (_node, client) = connected().await;
        assert!(client.capabilities().embedded_frameworks);

        let address = client
            .deploy_embedded_framework(
                Bytes::from_slice(&[0x60, 0x00]),
                &CallOptions::default(),
            )
            .await
            .unwrap();
        assert!(!address.is_zero());
    }

    #[tokio::test]
    async fn test_legacy_framework_rejects_embedded_deployment() {
        let node = DevNode::connect(&ClientConfig::for_testing()).unwrap();
        let legacy = ElaraClient::new(
            ClientConfig::for_testing(),
            Abi::from_json(r#"[{"name": "createSubId", "type": "function"}]"#).unwrap(),
            node,
        )
        .with_wallet(Arc::new(StaticWallet::new(vec![OWNER])));
        assert!(legacy.connect_wallet().await);

        let err = legacy
            .deploy_embedded_framework(Bytes::new(), &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::CapabilityUnsupported(_)));
    }

    #[tokio::test]
    async fn test_framework_queries() {
        let (node, client) = connected().await;

        let version = client.get_framework_version().await.unwrap();
        assert!(!version.is_empty());

        let fee = client.get_sub_id_fee().await.unwrap();
        assert_eq!(client.get_sub_id_fee().await.unwrap(), fee);

        node.set_fee(U256::from(250));
        assert_eq!(client.get_sub_id_fee().await.unwrap(), U256::from(250));

        let limit = client.get_sub_id_limit().await.unwrap();
        assert!(limit > U256::zero());
    }

    #[tokio::test]
    async fn test_interaction_code_generation() {
        let (_node, client) = connected().await;
        let sub_id = create(&client).await;
        client
            .deploy_sub_id_logic(sub_id, Bytes::from_slice(&[0x60]))
            .await
            .unwrap();

        let code = client
            .generate_interaction_code(sub_id, &RustBindingGenerator)
            .await
            .unwrap();
        assert!(code.contains("pub async fn ping"));
        assert!(code.contains("pub async fn echo"));
    }

    #[tokio::test]
    async fn test_concurrent_operations_are_independent() {
        let (_node, client) = connected().await;
        let client = Arc::new(client);
        let fee = client.get_sub_id_fee().await.unwrap();

        let a = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .create_sub_id(Hash::new([1u8; 32]), &CallOptions::with_fee(fee))
                    .await
            })
        };
        let b = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .create_sub_id(Hash::new([2u8; 32]), &CallOptions::with_fee(fee))
                    .await
            })
        };

        let first = a.await.unwrap().unwrap();
        let second = b.await.unwrap().unwrap();
        assert_ne!(first, second);
    }
}
