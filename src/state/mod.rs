//! Shared application state: the installed record store, runtime
//! configuration, and the per-session serialization gates.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{config::AppConfig, dao::record_store::RecordStore, error::ServiceError};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state shared by every route and service.
pub struct AppState {
    record_store: RwLock<Option<Arc<dyn RecordStore>>>,
    config: AppConfig,
    session_gates: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a record store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            record_store: RwLock::new(None),
            config,
            session_gates: DashMap::new(),
        })
    }

    /// Runtime configuration loaded at startup.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current record store, if one is installed.
    pub async fn record_store(&self) -> Option<Arc<dyn RecordStore>> {
        let guard = self.record_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the record store or fail with a degraded-mode error.
    pub async fn require_record_store(&self) -> Result<Arc<dyn RecordStore>, ServiceError> {
        self.record_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a record store implementation and leave degraded mode.
    pub async fn install_record_store(&self, store: Arc<dyn RecordStore>) {
        let mut guard = self.record_store.write().await;
        *guard = Some(store);
    }

    /// Remove the current record store and enter degraded mode.
    pub async fn clear_record_store(&self) {
        let mut guard = self.record_store.write().await;
        guard.take();
    }

    /// Whether the application currently lacks a record store.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.record_store.read().await;
        guard.is_none()
    }

    /// Mutex serializing every roster mutation, formation run, and match
    /// declaration for one session. Operations on different sessions run
    /// independently.
    ///
    /// Callers verify the session exists before acquiring a gate so unknown
    /// ids do not accumulate entries in the registry.
    pub fn session_gate(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        self.session_gates
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Whether a gate is currently registered for a session.
    pub fn has_session_gate(&self, session_id: Uuid) -> bool {
        self.session_gates.contains_key(&session_id)
    }

    /// Drop the gate of a deleted session.
    pub fn forget_session_gate(&self, session_id: Uuid) {
        self.session_gates.remove(&session_id);
    }
}
