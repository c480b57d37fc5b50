use std::sync::Arc;

use tokio::sync::Mutex;

use crate::services::{Credentials, SnapshotService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SnapshotService>,
    pub settings: Arc<ApiSettings>,
    /// Held for the whole of a load-or-build so two requests never aggregate at once
    pub rebuild_lock: Arc<Mutex<()>>,
}

/// Request defaults the HTTP surface applies on behalf of callers
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub credentials: Credentials,
    pub default_max_pages: u32,
}

impl AppState {
    pub fn new(service: SnapshotService, settings: ApiSettings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
            rebuild_lock: Arc::new(Mutex::new(())),
        }
    }
}
