//! # Relay Runtime
//!
//! Drives the signing pipeline and the rotator on independent intervals.
//!
//! ## Loop
//!
//! - Poll tick: one pipeline run over the configured queues. Failures are
//!   logged and the loop carries on; the next tick is the retry.
//! - Rotation tick: one `rotate_next`. The first rotation fires one full
//!   interval after start.
//! - Shutdown: the loop exits once the watch value turns `true`. The same
//!   receiver is the pipeline's cancellation signal.

use anyhow::{Context, Result};
use relay_01_message_signing::{
    ActiveCredential, CredentialBackend, MessageQueryClient, MessageSigningApi, RelayError,
    RelayReport, RelaySigningService, SignatureSubmitter, SigningConfig,
};
use relay_02_credential_rotation::CredentialRotator;
use relay_telemetry::log_event;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use crate::container::RelayConfig;
use crate::wiring::{build_registry, wire_rotator};

/// The relay process: signing service plus credential rotator.
pub struct RelayRuntime<C, B>
where
    C: MessageQueryClient + SignatureSubmitter + 'static,
    B: CredentialBackend,
{
    config: RelayConfig,
    service: RelaySigningService<Arc<C>, Arc<C>, B>,
    rotator: CredentialRotator,
    active: ActiveCredential,
}

impl<C, B> RelayRuntime<C, B>
where
    C: MessageQueryClient + SignatureSubmitter + 'static,
    B: CredentialBackend,
{
    /// Create a runtime over `client` (query and submission) and `backend`.
    ///
    /// ## Initialization Order
    ///
    /// 1. Validate configuration
    /// 2. Build the payload registry
    /// 3. Create the active-credential slot on the first credential
    /// 4. Wire the rotator into the slot
    /// 5. Build the signing service
    pub fn new(config: RelayConfig, client: Arc<C>, backend: B) -> Result<Self> {
        config.validate().context("invalid relay configuration")?;

        let registry = build_registry();

        let first = config
            .credentials
            .first()
            .cloned()
            .context("no credential to start with")?;
        let active = ActiveCredential::new(first);

        let rotator = wire_rotator(config.credentials.clone(), active.clone())
            .context("failed to build credential rotator")?;

        let service = RelaySigningService::new(
            SigningConfig::new(config.validator.clone()),
            Arc::clone(&client),
            client,
            backend,
            active.clone(),
            registry,
        );

        info!(
            validator = %config.validator,
            queues = config.queues.len(),
            credentials = config.credentials.len(),
            "Relay runtime created"
        );

        Ok(Self {
            config,
            service,
            rotator,
            active,
        })
    }

    /// Configuration the runtime was built with.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Credential the next run will sign with.
    pub fn active_credential(&self) -> String {
        self.active.current()
    }

    /// Advance to the next credential.
    pub fn rotate(&self) {
        self.rotator.rotate_next();
    }

    /// One pipeline run that cannot be cancelled.
    pub async fn run_once(&self) -> Result<RelayReport, RelayError> {
        let (_never, cancel) = watch::channel(false);
        self.service
            .sign_messages_for_execution(&self.config.queues, &cancel)
            .await
    }

    /// Run until `shutdown` turns `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let start = Instant::now();
        let mut poll = interval_at(start, self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut rotation = interval_at(
            start + self.config.rotation_interval,
            self.config.rotation_interval,
        );
        rotation.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Relay runtime started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = poll.tick() => {
                    self.tick(&shutdown).await;
                }
                _ = rotation.tick() => {
                    self.rotator.rotate_next();
                }
            }
        }

        info!("Relay runtime stopped");
    }

    async fn tick(&self, shutdown: &watch::Receiver<bool>) {
        match self
            .service
            .sign_messages_for_execution(&self.config.queues, shutdown)
            .await
        {
            Ok(report) => {
                log_event!(
                    debug,
                    "runtime",
                    batch_size = report.total_signed(),
                    broadcast = report.broadcast,
                    "Tick complete"
                );
            }
            Err(RelayError::ContextCancelled { .. }) => {
                log_event!(debug, "runtime", "Tick cancelled by shutdown");
            }
            Err(err) => {
                log_event!(
                    warn,
                    "runtime",
                    error = %err,
                    retryable = err.is_retryable(),
                    "Tick failed, retrying on next interval"
                );
            }
        }
    }
}
