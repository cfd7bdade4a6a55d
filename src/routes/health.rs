use crate::error::ApiError;
use crate::fairings::TracingSpan;
use crate::state::ServiceState;
use crate::types::health::HealthReport;
use rocket::serde::json::Json;
use rocket::{Orbit, Rocket, Route};

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthReport),
        (
            status = 500,
            description = "Internal server error",
            body = crate::error::ErrorResponse
        ),
    )
)]
#[get("/health")]
pub async fn get_health(
    server: &Rocket<Orbit>,
    span: TracingSpan,
) -> Result<Json<HealthReport>, ApiError> {
    let state = server
        .state::<ServiceState>()
        .ok_or_else(|| ApiError::Internal("ServiceState not found in managed state".into()))?;

    let report = state.health_report();
    span.0
        .in_scope(|| tracing::debug!(uptime = report.uptime, "health report generated"));
    Ok(Json(report))
}

pub fn routes() -> Vec<Route> {
    rocket::routes![get_health]
}
