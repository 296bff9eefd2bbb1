use crate::error::ApiError;
use axum::{
    Router,
    extract::{Json, State},
    routing::{get, post},
};
use purifier_core::Skill;
use purifier_skill_types::{RequestEnvelope, ResponseEnvelope};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub skill: Arc<Skill>,
    pub skill_id: Option<String>,
}

impl AppState {
    pub fn new(skill: Arc<Skill>, skill_id: Option<String>) -> Self {
        Self { skill, skill_id }
    }
}

/// Builds the HTTP surface of the skill.
///
/// *   `POST /skill`: request envelope in, response envelope out.
/// *   `GET /health`: liveness probe.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/skill", post(skill_handler))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Runs one envelope through the skill. Skill-level failures are already
/// folded into a spoken apology, so only envelopes for another skill are
/// refused here.
async fn skill_handler(
    State(state): State<AppState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    verify_application(state.skill_id.as_deref(), &envelope)?;
    Ok(Json(state.skill.handle(&envelope).await))
}

fn verify_application(expected: Option<&str>, envelope: &RequestEnvelope) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match envelope.application_id() {
        Some(id) if id == expected => Ok(()),
        Some(id) => {
            tracing::warn!("Refusing request for application {}", id);
            Err(ApiError::WrongApplication(id.to_string()))
        }
        None => Err(ApiError::MissingApplication),
    }
}
