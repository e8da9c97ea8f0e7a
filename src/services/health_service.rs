use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with the current health status, probing the record store.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_record_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "record store health check failed");
            }
        }
        Err(_) => warn!("record store unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
