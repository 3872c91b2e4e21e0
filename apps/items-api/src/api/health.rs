//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use sea_orm::DatabaseConnection;

/// `GET /ready`: 200 when the database answers, 503 otherwise
pub fn router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(db)
}

async fn readiness_check(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}
