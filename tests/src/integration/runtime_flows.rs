//! # Runtime Flows
//!
//! The composition root wiring relay-01 and relay-02 together.
//!
//! ## Flows Tested
//!
//! 1. **Config to runtime**: environment-style configuration builds a runtime
//! 2. **Scheduled loop**: polls drain newly queued messages, rotation switches
//!    the signing key, shutdown stops the loop

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    use relay_01_message_signing::{
        signing_bytes, CanonicalJsonEncoder, InMemoryChainClient, LocalKeyring,
    };
    use relay_runtime::{ConfigError, RelayConfig, RelayRuntime};
    use shared_types::{Signable, SubmitLogicCall};

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn config() -> RelayConfig {
        RelayConfig::from_lookup(env(&[
            ("RELAY_VALIDATOR", "validator-1"),
            ("RELAY_QUEUES", "calls"),
            ("RELAY_CREDENTIALS", "key-a,key-b"),
            ("RELAY_POLL_INTERVAL_SECS", "5"),
            ("RELAY_ROTATION_INTERVAL_SECS", "12"),
        ]))
    }

    fn keyring() -> Arc<LocalKeyring> {
        let keyring = LocalKeyring::new();
        keyring.insert_secp256k1("key-a", [0xA1; 32]).unwrap();
        keyring.insert_ed25519("key-b", [0xB2; 32]);
        Arc::new(keyring)
    }

    fn call(deadline: i64) -> SubmitLogicCall {
        SubmitLogicCall {
            chain_reference_id: "eth-main".to_string(),
            contract_address: "0xfeed".to_string(),
            payload: vec![1, 2, 3],
            deadline,
        }
    }

    fn signed(deadline: i64, nonce: &[u8]) -> Vec<u8> {
        signing_bytes(&CanonicalJsonEncoder, &Signable::from(call(deadline)), nonce).unwrap()
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let config = RelayConfig::from_lookup(env(&[
            ("RELAY_VALIDATOR", "validator-1"),
            ("RELAY_QUEUES", "calls"),
        ]));
        assert_eq!(config.validate(), Err(ConfigError::NoCredentials));

        let result = RelayRuntime::new(config, Arc::new(InMemoryChainClient::new()), keyring());
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_drains_rotates_and_shuts_down() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();
        client.enqueue_payload("calls", 1, b"n1", &call(1)).unwrap();

        let runtime = Arc::new(RelayRuntime::new(config(), client.clone(), keyring.clone()).unwrap());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = {
            let runtime = runtime.clone();
            tokio::spawn(async move { runtime.run(shutdown_rx).await })
        };

        // t=0 poll signs message 1 with key-a.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(client.submissions().len(), 1);
        assert_eq!(runtime.active_credential(), "key-a");

        // t=12 rotation to key-b.
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(runtime.active_credential(), "key-b");

        // t=15 poll signs message 2 with key-b.
        client.enqueue_payload("calls", 2, b"n2", &call(2)).unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        let submissions = client.submissions();
        assert_eq!(submissions.len(), 2);
        assert_eq!(client.pending("calls"), 0);

        let first = &submissions[0][0];
        let second = &submissions[1][0];
        assert_eq!((first.id, second.id), (1, 2));
        assert!(keyring.verify("key-a", &signed(1, b"n1"), &first.signature));
        assert!(keyring.verify("key-b", &signed(2, b"n2"), &second.signature));
        assert!(!keyring.verify("key-a", &signed(2, b"n2"), &second.signature));
    }

    #[tokio::test]
    async fn test_run_once_reports_batch() {
        let client = Arc::new(InMemoryChainClient::new());
        client.enqueue_payload("calls", 1, b"n", &call(1)).unwrap();
        client.enqueue_payload("calls", 2, b"n", &call(2)).unwrap();

        let runtime = RelayRuntime::new(config(), client.clone(), keyring()).unwrap();
        let report = runtime.run_once().await.unwrap();

        assert_eq!(report.total_signed(), 2);
        assert!(report.broadcast);
        assert_eq!(report.credential, "key-a");
    }
}
