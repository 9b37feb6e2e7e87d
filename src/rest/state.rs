//! API state management for the REST server.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::persistence::{
    JsonFileGateway, PersistWorker, PersistenceGateway, RetrySettings, WriteBehind, WriterStats,
};
use crate::session::WizardSession;
use crate::wizard::StepCatalog;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Step catalog shared by every session
    pub catalog: Arc<StepCatalog>,
    /// Open wizard sessions keyed by listing id
    pub sessions: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
    /// Backend used to resume persisted listings
    pub gateway: Arc<dyn PersistenceGateway>,
    /// Write-behind handle given to new sessions
    pub writer: Option<WriteBehind>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(
        config: Config,
        gateway: Arc<dyn PersistenceGateway>,
        writer: Option<WriteBehind>,
    ) -> Self {
        Self {
            catalog: Arc::new(StepCatalog::listing()),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            gateway,
            writer,
            config: Arc::new(config),
        }
    }

    /// State backed by JSON files under the configured state directory,
    /// with a write-behind worker spawned on the current runtime.
    pub fn with_json_store(config: Config) -> (Self, JoinHandle<WriterStats>) {
        let gateway: Arc<dyn PersistenceGateway> =
            Arc::new(JsonFileGateway::new(&config.state_path()));
        let (writer, handle) =
            PersistWorker::spawn(gateway.clone(), RetrySettings::from(&config.persistence));
        (Self::new(config, gateway, Some(writer)), handle)
    }
}
