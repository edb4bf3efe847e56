//! # Health Check API
//!
//! Liveness and readiness probes. The HTTP status is the health signal:
//! `200` when the probe passed and `503` otherwise.

use rocket::{State, serde::json::Json};
use storefront::health::{HealthStatus, ReadinessStatus};

use crate::AppState;

#[derive(Responder)]
pub enum LivenessResponse {
    #[response(status = 200, content_type = "json")]
    Healthy(Json<HealthStatus>),
    #[response(status = 503, content_type = "json")]
    Unhealthy(Json<HealthStatus>),
}

impl From<HealthStatus> for LivenessResponse {
    fn from(status: HealthStatus) -> Self {
        if status.is_healthy() {
            LivenessResponse::Healthy(Json(status))
        } else {
            LivenessResponse::Unhealthy(Json(status))
        }
    }
}

#[derive(Responder)]
pub enum ReadinessResponse {
    #[response(status = 200, content_type = "json")]
    Ready(Json<ReadinessStatus>),
    #[response(status = 503, content_type = "json")]
    NotReady(Json<ReadinessStatus>),
}

impl From<ReadinessStatus> for ReadinessResponse {
    fn from(status: ReadinessStatus) -> Self {
        if status.is_ready() {
            ReadinessResponse::Ready(Json(status))
        } else {
            ReadinessResponse::NotReady(Json(status))
        }
    }
}

#[get("/")]
pub async fn health(state: &State<AppState>) -> LivenessResponse {
    state
        .prober
        .check_liveness(state.database.as_ref())
        .await
        .into()
}

#[get("/live")]
pub async fn live(state: &State<AppState>) -> LivenessResponse {
    health(state).await
}

#[get("/ready")]
pub async fn ready(state: &State<AppState>) -> ReadinessResponse {
    state
        .prober
        .check_readiness(state.database.as_ref())
        .await
        .into()
}

pub fn routes() -> Vec<rocket::Route> {
    routes![health, live, ready]
}
