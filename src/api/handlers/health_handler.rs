//! Health check.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub db_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthError {
    pub error: String,
}

/// Report the database clock, or 500 when the database is unreachable
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 500, description = "Database not reachable", body = HealthError)
    )
)]
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthError>)> {
    match state.database.now().await {
        Ok(db_time) => Ok(Json(HealthResponse {
            status: "OK".to_string(),
            db_time,
        })),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthError {
                    error: "Database not reachable".to_string(),
                }),
            ))
        }
    }
}
