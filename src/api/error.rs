use crate::utils::error::{ErrorKind, GatewayError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

const REDACTED_MESSAGE: &str = "Tariff calculation failed, please retry later";

/// 錯誤回應內容 `{"error": kind, "message": ..., "detail": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorKind,
    pub message: String,
    pub detail: Option<serde_json::Value>,
}

pub struct ApiError {
    error: GatewayError,
    expose_details: bool,
}

impl ApiError {
    pub fn new(error: GatewayError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            GatewayError::ValidationError {
                message: message.into(),
            },
            false,
        )
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ProviderStatusError | ErrorKind::ProviderShapeError => StatusCode::BAD_REQUEST,
        ErrorKind::StructuralParseError | ErrorKind::UnknownError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ErrorKind::UpstreamTransportError => StatusCode::BAD_GATEWAY,
        ErrorKind::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = self.error.payload();
        let status = status_for(payload.kind);

        // 伺服器端錯誤預設不把內部訊息回給呼叫端
        let body = if payload.kind.is_client_error() || self.expose_details {
            ErrorResponse {
                error: payload.kind,
                message: payload.message,
                detail: payload.detail,
            }
        } else {
            ErrorResponse {
                error: payload.kind,
                message: REDACTED_MESSAGE.to_string(),
                detail: None,
            }
        };

        (status, Json(body)).into_response()
    }
}
