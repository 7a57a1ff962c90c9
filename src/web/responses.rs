use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub meta: Option<Value>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success_with_meta(data: T, meta: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
            meta: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Errors a handler can answer with; rendered as a JSON error envelope.
#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    BadGateway(String),
    InternalServerError(String),
}

impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        WebError::BadGateway(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        WebError::InternalServerError(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            WebError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            WebError::BadRequest(_) => "BAD_REQUEST",
            WebError::BadGateway(_) => "BAD_GATEWAY",
            WebError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn message(&self) -> String {
        match self {
            WebError::BadRequest(msg) => msg.clone(),
            WebError::BadGateway(msg) => msg.clone(),
            WebError::InternalServerError(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::error(self.error_code(), self.message());
        (status, Json(body)).into_response()
    }
}
