//! # Rotation Flows
//!
//! relay-02 driving which credential relay-01 signs with.
//!
//! ## Flows Tested
//!
//! 1. **Rotation between runs**: each run signs with the credential active at
//!    its start, and signatures verify only under that key
//! 2. **Contended rotation**: threads rotating concurrently produce the exact
//!    cyclic sequence

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;
    use tokio::sync::watch;

    use relay_01_message_signing::{
        signing_bytes, ActiveCredential, CanonicalJsonEncoder, InMemoryChainClient, LocalKeyring,
        MessageSigningApi, RelaySigningService, SigningConfig,
    };
    use relay_02_credential_rotation::CredentialRotator;
    use shared_types::{PayloadRegistry, Signable, UpdateValset};

    const IDS: [&str; 3] = ["foo", "bar", "baz"];

    fn valset(id: u64) -> UpdateValset {
        UpdateValset {
            chain_reference_id: "eth-main".to_string(),
            valset_id: id,
            validators: vec!["0x01".to_string()],
            powers: vec![100],
            checkpoint: vec![id as u8; 32],
        }
    }

    fn keyring() -> Arc<LocalKeyring> {
        let keyring = LocalKeyring::new();
        for (i, id) in IDS.iter().enumerate() {
            keyring.insert_secp256k1(id, [i as u8 + 1; 32]).unwrap();
        }
        Arc::new(keyring)
    }

    fn ids() -> Vec<String> {
        IDS.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_each_run_signs_with_rotated_credential() {
        let client = Arc::new(InMemoryChainClient::new());
        let keyring = keyring();
        let active = ActiveCredential::new(IDS[0]);

        let rotator = {
            let active = active.clone();
            CredentialRotator::new(ids(), move |id| active.set(id)).unwrap()
        };

        let service = RelaySigningService::new(
            SigningConfig::new("validator-1"),
            client.clone(),
            client.clone(),
            keyring.clone(),
            active.clone(),
            Arc::new(PayloadRegistry::with_default_payloads()),
        );
        let (_tx, cancel) = watch::channel(false);
        let queues = vec!["valset".to_string()];

        let mut used = Vec::new();
        for round in 0..4u64 {
            client
                .enqueue_payload("valset", round, b"n", &valset(round))
                .unwrap();
            let report = service
                .sign_messages_for_execution(&queues, &cancel)
                .await
                .unwrap();
            used.push(report.credential);
            rotator.rotate_next();
        }

        assert_eq!(used, vec!["foo", "bar", "baz", "foo"]);

        let submissions = client.submissions();
        for (round, batch) in submissions.iter().enumerate() {
            let credential = &used[round];
            let record = &batch[0];
            let other = IDS.iter().find(|id| **id != credential.as_str()).unwrap();

            let message =
                signing_bytes(&CanonicalJsonEncoder, &Signable::from(valset(round as u64)), b"n")
                    .unwrap();
            assert!(keyring.verify(credential, &message, &record.signature));
            assert!(!keyring.verify(other, &message, &record.signature));
        }
    }

    #[test]
    fn test_contended_rotation_is_totally_ordered() {
        const CALLERS: usize = 16;
        const ROTATIONS: usize = 100;

        let active = ActiveCredential::new(IDS[0]);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let rotator = {
            let active = active.clone();
            let seen = seen.clone();
            Arc::new(
                CredentialRotator::new(ids(), move |id| {
                    active.set(id);
                    seen.lock().push(id.to_string());
                })
                .unwrap(),
            )
        };

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let rotator = rotator.clone();
                thread::spawn(move || {
                    for _ in 0..ROTATIONS {
                        rotator.rotate_next();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), CALLERS * ROTATIONS);
        for (i, id) in seen.iter().enumerate() {
            assert_eq!(id, IDS[(i + 1) % IDS.len()]);
        }
        // 1600 rotations from "foo" land on index 1600 % 3 == 1.
        assert_eq!(active.current(), "bar");
    }
}
