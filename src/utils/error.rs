use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Provider rejected the request: {status}")]
    ProviderStatusError { status: serde_json::Value },

    #[error("Provider response has no order list: {status}")]
    ProviderShapeError { status: serde_json::Value },

    #[error("Unexpected provider response structure: {message}")]
    StructuralParseError { message: String },

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Provider request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}")]
    UpstreamStatusError { status: u16, body: String },

    #[error("SOAP fault {code}: {message}")]
    SoapFault { code: String, message: String },

    #[error("Malformed SOAP envelope: {message}")]
    SoapEnvelopeError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

/// 對外公開的錯誤分類，每個 `GatewayError` 都會落在其中一類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    ProviderStatusError,
    ProviderShapeError,
    StructuralParseError,
    UpstreamTransportError,
    UpstreamTimeout,
    UnknownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::ProviderStatusError => "ProviderStatusError",
            ErrorKind::ProviderShapeError => "ProviderShapeError",
            ErrorKind::StructuralParseError => "StructuralParseError",
            ErrorKind::UpstreamTransportError => "UpstreamTransportError",
            ErrorKind::UpstreamTimeout => "UpstreamTimeout",
            ErrorKind::UnknownError => "UnknownError",
        }
    }

    /// 是否屬於呼叫端的錯誤 (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::ValidationError
                | ErrorKind::ProviderStatusError
                | ErrorKind::ProviderShapeError
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 結構化的錯誤內容 `{kind, message, detail}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Option<serde_json::Value>,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::ValidationError { .. } => ErrorKind::ValidationError,
            GatewayError::ProviderStatusError { .. } => ErrorKind::ProviderStatusError,
            GatewayError::ProviderShapeError { .. } => ErrorKind::ProviderShapeError,
            GatewayError::StructuralParseError { .. } | GatewayError::XmlError(_) => {
                ErrorKind::StructuralParseError
            }
            GatewayError::ApiError(e) if e.is_timeout() => ErrorKind::UpstreamTimeout,
            GatewayError::ApiError(_)
            | GatewayError::UpstreamStatusError { .. }
            | GatewayError::SoapFault { .. }
            | GatewayError::SoapEnvelopeError { .. } => ErrorKind::UpstreamTransportError,
            GatewayError::IoError(_)
            | GatewayError::ConfigError { .. }
            | GatewayError::MissingConfigError { .. }
            | GatewayError::InvalidConfigValueError { .. }
            | GatewayError::Unknown { .. } => ErrorKind::UnknownError,
        }
    }

    /// 閘道不會自動重試，只告知呼叫端是否值得重試
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UpstreamTransportError | ErrorKind::UpstreamTimeout
        )
    }

    /// 供診斷用的原始資料 (provider 狀態節點或 SOAP fault 內容)
    pub fn detail(&self) -> Option<serde_json::Value> {
        match self {
            GatewayError::ProviderStatusError { status }
            | GatewayError::ProviderShapeError { status } => Some(status.clone()),
            GatewayError::UpstreamStatusError { status, body } => Some(serde_json::json!({
                "status": status,
                "body": body,
            })),
            GatewayError::SoapFault { code, message } => Some(serde_json::json!({
                "faultcode": code,
                "faultstring": message,
            })),
            _ => None,
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
            detail: self.detail(),
        }
    }

    pub fn structural(message: impl Into<String>) -> Self {
        GatewayError::StructuralParseError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
