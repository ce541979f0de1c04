use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use ipn::IpnError;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// Body is not a notification
    BadRequest(String),
    /// Verified notification with unparsable amount or label
    InvalidInput(String),
    /// Signature mismatch
    Unauthorized,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            ApiError::Unauthorized => write!(f, "sign wrong"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<IpnError> for ApiError {
    fn from(e: IpnError) -> Self {
        match e {
            IpnError::SignatureMismatch => ApiError::Unauthorized,
            IpnError::InvalidAmount { .. } | IpnError::InvalidLabel { .. } => {
                ApiError::InvalidInput(e.to_string())
            }
            IpnError::SerdeError(e) => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::BadRequest(msg) | ApiError::InvalidInput(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            // Never echo the computed signature.
            ApiError::Unauthorized => {
                HttpResponse::Unauthorized().json(serde_json::json!({ "error": "sign wrong" }))
            }
        }
    }
}
