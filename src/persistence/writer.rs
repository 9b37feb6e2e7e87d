//! Write-behind persistence worker.
//!
//! Navigation emits a [`PersistEvent`] and moves on; a background task drains
//! the channel and writes through a [`PersistenceGateway`] with exponential
//! backoff. Senders never learn whether a write succeeded.

use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::gateway::PersistenceGateway;
use crate::config::PersistenceConfig;
use crate::listing::ListingForm;

/// Event emitted by a session for the writer to persist
#[derive(Debug, Clone)]
pub enum PersistEvent {
    /// The user moved past a step; persist the snapshot taken at that moment
    StepCommitted {
        listing_id: Uuid,
        step_index: usize,
        form_position: usize,
        snapshot: ListingForm,
    },
}

impl PersistEvent {
    pub fn listing_id(&self) -> Uuid {
        match self {
            PersistEvent::StepCommitted { listing_id, .. } => *listing_id,
        }
    }
}

/// Retry policy for gateway writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self::from(&PersistenceConfig::default())
    }
}

impl From<&PersistenceConfig> for RetrySettings {
    fn from(config: &PersistenceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Counters reported when the worker exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    pub written: usize,
    pub failed: usize,
}

/// Sending half handed to sessions. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WriteBehind {
    tx: mpsc::UnboundedSender<PersistEvent>,
}

impl WriteBehind {
    /// Create a handle and the receiver it feeds
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PersistEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an event without waiting. Dropped with a warning if the worker is gone.
    pub fn emit(&self, event: PersistEvent) {
        let listing_id = event.listing_id();
        if self.tx.send(event).is_err() {
            warn!(listing = %listing_id, "write-behind worker stopped, dropping event");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Background worker that owns the receiving half
pub struct PersistWorker {
    gateway: Arc<dyn PersistenceGateway>,
    rx: mpsc::UnboundedReceiver<PersistEvent>,
    retry: RetrySettings,
    stats: WriterStats,
}

impl PersistWorker {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        retry: RetrySettings,
    ) -> (Self, WriteBehind) {
        let (handle, rx) = WriteBehind::channel();
        let worker = Self {
            gateway,
            rx,
            retry,
            stats: WriterStats::default(),
        };
        (worker, handle)
    }

    /// Spawn the worker on the current runtime
    pub fn spawn(
        gateway: Arc<dyn PersistenceGateway>,
        retry: RetrySettings,
    ) -> (WriteBehind, JoinHandle<WriterStats>) {
        let (worker, handle) = Self::new(gateway, retry);
        (handle, tokio::spawn(worker.run()))
    }

    fn retry_strategy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.retry.base_delay)
            .with_max_delay(self.retry.max_delay)
            .with_max_times(self.retry.max_retries)
    }

    /// Drain events until every sender is dropped
    pub async fn run(mut self) -> WriterStats {
        info!("write-behind worker started");

        while let Some(event) = self.rx.recv().await {
            self.handle(event).await;
        }

        info!(
            written = self.stats.written,
            failed = self.stats.failed,
            "write-behind worker stopped"
        );
        self.stats
    }

    async fn handle(&mut self, event: PersistEvent) {
        let PersistEvent::StepCommitted {
            listing_id,
            step_index,
            form_position,
            snapshot,
        } = event;

        let gateway = self.gateway.clone();
        let op = || async { gateway.save(&snapshot).await };

        let result = op
            .retry(self.retry_strategy())
            .notify(|err, dur| {
                warn!(listing = %listing_id, "Retrying listing save after {:?}: {}", dur, err);
            })
            .await;

        match result {
            Ok(()) => {
                self.stats.written += 1;
                debug!(listing = %listing_id, step_index, form_position, "step committed");
            }
            Err(e) => {
                self.stats.failed += 1;
                error!(
                    listing = %listing_id,
                    step_index,
                    "Giving up on listing save: {:#}",
                    e
                );
            }
        }
    }
}
