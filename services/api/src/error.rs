use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Request is addressed to application {0}, not this skill")]
    WrongApplication(String),

    #[error("Request carries no application id")]
    MissingApplication,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::WrongApplication(_) | ApiError::MissingApplication => StatusCode::FORBIDDEN,
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
