//! # Pipeline Flows
//!
//! Drives relay-01 end to end against the in-memory chain client and a real
//! secp256k1 keyring.
//!
//! ## Flows Tested
//!
//! 1. **Mixed queues**: every payload variant signed and submitted in one batch
//! 2. **Verifiable signatures**: each signature checks out against the public key
//!    over `canonical(payload) ++ nonce`
//! 3. **Atomicity**: any failure leaves the remote queues untouched
//! 4. **Cancellation**: a shutdown observed mid-run suppresses the broadcast

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use k256::ecdsa::signature::Verifier;
    use k256::ecdsa::{Signature, VerifyingKey};
    use std::sync::Arc;
    use tokio::sync::watch;

    use relay_01_message_signing::{
        encode_canonical, ActiveCredential, InMemoryChainClient, LocalKeyring, MessageQueryClient,
        MessageSigningApi, RelayError, RelaySigningService, SigningConfig,
    };
    use shared_types::{
        PayloadRegistry, Signable, SubmitLogicCall, UpdateValset, UploadSmartContract,
        ValidatorBalancesAttestation, WireMessage,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const SECRET: [u8; 32] = [0x42; 32];

    fn valset() -> UpdateValset {
        UpdateValset {
            chain_reference_id: "eth-main".to_string(),
            valset_id: 12,
            validators: vec!["0xaa".to_string(), "0xbb".to_string()],
            powers: vec![60, 40],
            checkpoint: vec![0xC0; 32],
        }
    }

    fn logic_call() -> SubmitLogicCall {
        SubmitLogicCall {
            chain_reference_id: "eth-main".to_string(),
            contract_address: "0x1234".to_string(),
            payload: vec![0xde, 0xad, 0xbe, 0xef],
            deadline: 1_700_000_000,
        }
    }

    fn upload() -> UploadSmartContract {
        UploadSmartContract {
            chain_reference_id: "bnb-main".to_string(),
            abi: "[]".to_string(),
            bytecode: vec![0x60, 0x80],
            constructor_input: vec![],
        }
    }

    fn balances() -> ValidatorBalancesAttestation {
        ValidatorBalancesAttestation {
            chain_reference_id: "eth-main".to_string(),
            from_block_time: 1_699_999_000,
            hex_addresses: vec!["0xaa".to_string()],
            request_hash: vec![7; 32],
        }
    }

    fn keyring() -> Arc<LocalKeyring> {
        let keyring = LocalKeyring::new();
        keyring.insert_secp256k1("validator-key", SECRET).unwrap();
        Arc::new(keyring)
    }

    fn queues(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn service<Q>(
        query: Q,
        client: &Arc<InMemoryChainClient>,
        keyring: &Arc<LocalKeyring>,
    ) -> RelaySigningService<Q, Arc<InMemoryChainClient>, Arc<LocalKeyring>>
    where
        Q: MessageQueryClient,
    {
        RelaySigningService::new(
            SigningConfig::new("validator-1"),
            query,
            client.clone(),
            keyring.clone(),
            ActiveCredential::new("validator-key"),
            Arc::new(PayloadRegistry::with_default_payloads()),
        )
    }

    fn verify(keyring: &LocalKeyring, message: &[u8], signature: &[u8]) -> bool {
        let public = keyring.public_key("validator-key").unwrap();
        let key = VerifyingKey::from_sec1_bytes(&public).unwrap();
        let signature = Signature::from_slice(signature).unwrap();
        key.verify(message, &signature).is_ok()
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_mixed_queues_single_batch_with_verifiable_signatures() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();

        client.enqueue_payload("valset", 1, b"nonce-1", &valset()).unwrap();
        client.enqueue_payload("calls", 2, b"nonce-2", &logic_call()).unwrap();
        client.enqueue_payload("calls", 3, b"nonce-3", &upload()).unwrap();
        client.enqueue_payload("balances", 4, b"nonce-4", &balances()).unwrap();

        let (_tx, cancel) = watch::channel(false);
        let report = service(client.clone(), &client, &keyring)
            .sign_messages_for_execution(&queues(&["valset", "calls", "balances"]), &cancel)
            .await
            .unwrap();

        assert_eq!(report.total_signed(), 4);
        assert_eq!(client.submit_calls(), 1);

        let expected: Vec<(u64, Signable, &[u8])> = vec![
            (1, valset().into(), &b"nonce-1"[..]),
            (2, logic_call().into(), &b"nonce-2"[..]),
            (3, upload().into(), &b"nonce-3"[..]),
            (4, balances().into(), &b"nonce-4"[..]),
        ];

        let batch = &client.submissions()[0];
        assert_eq!(batch.len(), expected.len());
        for (record, (id, payload, nonce)) in batch.iter().zip(&expected) {
            assert_eq!(record.id, *id);
            let mut signed = encode_canonical(payload).unwrap();
            signed.extend_from_slice(nonce);
            assert!(verify(&keyring, &signed, &record.signature), "message {id}");
        }
    }

    #[tokio::test]
    async fn test_signed_bytes_are_sorted_compact_json() {
        let encoded = encode_canonical(&Signable::from(valset())).unwrap();
        let text = String::from_utf8(encoded).unwrap();

        assert!(text.starts_with(r#"{"chain_reference_id":"eth-main","checkpoint":"#));
        assert!(text.ends_with(r#""validators":["0xaa","0xbb"],"valset_id":12}"#));
        assert!(!text.contains(' '));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["powers"], serde_json::json!([60, 40]));
    }

    #[tokio::test]
    async fn test_nonce_changes_signature() {
        let mut signatures = Vec::new();
        for nonce in [b"attempt-1", b"attempt-2"] {
            let client = Arc::new(InMemoryChainClient::new());
            let keyring = keyring();
            client.enqueue_payload("valset", 1, nonce, &valset()).unwrap();

            let (_tx, cancel) = watch::channel(false);
            service(client.clone(), &client, &keyring)
                .sign_messages_for_execution(&queues(&["valset"]), &cancel)
                .await
                .unwrap();
            signatures.push(hex::encode(&client.submissions()[0][0].signature));
        }
        assert_ne!(signatures[0], signatures[1]);
    }

    #[tokio::test]
    async fn test_locked_key_mid_batch_leaves_queues_untouched() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();
        client.enqueue_payload("valset", 1, b"n", &valset()).unwrap();
        client.enqueue_payload("calls", 2, b"n", &logic_call()).unwrap();
        keyring.lock("validator-key");

        let (_tx, cancel) = watch::channel(false);
        let result = service(client.clone(), &client, &keyring)
            .sign_messages_for_execution(&queues(&["valset", "calls"]), &cancel)
            .await;

        assert!(matches!(result, Err(RelayError::Signing { message_id: 1, .. })));
        assert_eq!(client.submit_calls(), 0);
        assert_eq!(client.pending("valset"), 1);
        assert_eq!(client.pending("calls"), 1);
    }

    #[tokio::test]
    async fn test_corrupt_envelope_in_last_queue_aborts_whole_batch() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();
        client.enqueue_payload("valset", 1, b"n", &valset()).unwrap();
        client.enqueue(
            "calls",
            WireMessage::new(
                9,
                b"n".to_vec(),
                shared_types::TypedEnvelope::new(SubmitLogicCall::TYPE_URL, b"not json".to_vec()),
            ),
        );

        let (_tx, cancel) = watch::channel(false);
        let result = service(client.clone(), &client, &keyring)
            .sign_messages_for_execution(&queues(&["valset", "calls"]), &cancel)
            .await;

        assert!(matches!(result, Err(RelayError::Unpack { message_id: 9, .. })));
        assert_eq!(client.submit_calls(), 0);
    }

    /// Query client that flips the cancel signal after serving a given queue.
    struct CancelAfter {
        inner: Arc<InMemoryChainClient>,
        queue: &'static str,
        cancel: watch::Sender<bool>,
    }

    #[async_trait]
    impl MessageQueryClient for CancelAfter {
        async fn fetch_queued_messages(
            &self,
            queue_type_name: &str,
            validator: &str,
        ) -> Result<Vec<WireMessage>, RelayError> {
            let messages = self
                .inner
                .fetch_queued_messages(queue_type_name, validator)
                .await?;
            if queue_type_name == self.queue {
                let _ = self.cancel.send(true);
            }
            Ok(messages)
        }
    }

    #[tokio::test]
    async fn test_cancel_during_last_queue_suppresses_broadcast() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();
        client.enqueue_payload("valset", 1, b"n", &valset()).unwrap();
        client.enqueue_payload("calls", 2, b"n", &logic_call()).unwrap();

        let (tx, cancel) = watch::channel(false);
        let query = CancelAfter {
            inner: client.clone(),
            queue: "calls",
            cancel: tx,
        };

        let result = service(query, &client, &keyring)
            .sign_messages_for_execution(&queues(&["valset", "calls"]), &cancel)
            .await;

        assert!(matches!(
            result,
            Err(RelayError::ContextCancelled { ref stage }) if stage == "broadcast"
        ));
        assert_eq!(client.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_first_queue_stops_before_second() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();
        client.enqueue_payload("valset", 1, b"n", &valset()).unwrap();
        client.fail_queue("calls");

        let (tx, cancel) = watch::channel(false);
        let query = CancelAfter {
            inner: client.clone(),
            queue: "valset",
            cancel: tx,
        };

        // "calls" would fail with a query error; cancellation wins because it
        // is checked first.
        let result = service(query, &client, &keyring)
            .sign_messages_for_execution(&queues(&["valset", "calls"]), &cancel)
            .await;

        assert!(matches!(
            result,
            Err(RelayError::ContextCancelled { ref stage }) if stage == "calls"
        ));
    }
}
