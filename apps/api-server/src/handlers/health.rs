//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::observability::RequestId;
use crate::state::{AppState, StorageBackend};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub timestamp: String,
    pub request_id: String,
}

/// GET /api/health
///
/// Reports `degraded` with 503 when the database stops answering.
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let (status, storage) = match &state.storage {
        StorageBackend::InMemory => ("ok", "in-memory"),
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres(db) => {
            if db.ping().await {
                ("ok", "postgres")
            } else {
                ("degraded", "postgres")
            }
        }
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage,
        timestamp: chrono::Utc::now().to_rfc3339(),
        request_id: request_id.as_str().to_string(),
    };

    if status == "ok" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
