pub mod student;

use axum::{extract::Extension, http::StatusCode};
use cf_coach_libs::store::RosterStore;
use std::sync::Arc;

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(Extension(store): Extension<Arc<RosterStore>>) -> StatusCode {
    match store.list().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("roster is not readable: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
