//! Failure kinds for the signup tracker.
//!
//! `UpstreamError` is what the tracking client reports; `TrackError` is what the
//! handler boundary turns into a JSON response.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failure of the single outbound call to the tracking API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The API answered with a non-2xx status.
    #[error("tracking API returned HTTP {status}")]
    Rejected { status: u16, body: Value },

    /// The request went out but no response came back.
    #[error("no response received from tracking API: {reason}")]
    Unreachable { reason: String },

    /// The request could not be built or sent.
    #[error("error setting up request: {reason}")]
    RequestSetup { reason: String },

    #[error("{reason}")]
    Other { reason: String },
}

/// Everything the signup endpoint can answer with besides success.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("only POST requests are allowed")]
    MethodNotAllowed,

    #[error("missing _fprom_tid cookie")]
    MissingTrackingCookie,

    #[error("either email or uid is required")]
    MissingIdentity,

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("server configuration error: missing {}", .missing.join(", "))]
    ServerMisconfigured { missing: Vec<&'static str> },

    #[error("tracking API rejected the signup with HTTP {status}")]
    UpstreamRejected { status: u16, body: Value },

    #[error("no response received from FirstPromoter: {reason}")]
    UpstreamUnreachable { reason: String },

    #[error("error setting up request to FirstPromoter: {reason}")]
    RequestSetupFailed { reason: String },

    #[error("unexpected failure: {reason}")]
    UnknownFailure { reason: String },
}

impl From<UpstreamError> for TrackError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Rejected { status, body } => TrackError::UpstreamRejected { status, body },
            UpstreamError::Unreachable { reason } => TrackError::UpstreamUnreachable { reason },
            UpstreamError::RequestSetup { reason } => TrackError::RequestSetupFailed { reason },
            UpstreamError::Other { reason } => TrackError::UnknownFailure { reason },
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    message: &'static str,
    error: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl TrackError {
    /// Stable name of the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackError::MethodNotAllowed => "MethodNotAllowed",
            TrackError::MissingTrackingCookie => "MissingTrackingCookie",
            TrackError::MissingIdentity => "MissingIdentity",
            TrackError::PayloadTooLarge { .. } => "PayloadTooLarge",
            TrackError::ServerMisconfigured { .. } => "ServerMisconfigured",
            TrackError::UpstreamRejected { .. } => "UpstreamRejected",
            TrackError::UpstreamUnreachable { .. } => "UpstreamUnreachable",
            TrackError::RequestSetupFailed { .. } => "RequestSetupFailed",
            TrackError::UnknownFailure { .. } => "UnknownFailure",
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            TrackError::MethodNotAllowed => ErrorBody {
                success: None,
                message: "Method Not Allowed",
                error: Value::from("Only POST requests are allowed"),
                details: None,
            },
            TrackError::MissingTrackingCookie => ErrorBody {
                success: None,
                message: "Bad Request",
                error: Value::from("Missing _fprom_tid cookie"),
                details: None,
            },
            TrackError::MissingIdentity => ErrorBody {
                success: None,
                message: "Bad Request",
                error: Value::from("Either email or uid is required"),
                details: None,
            },
            TrackError::PayloadTooLarge { limit } => ErrorBody {
                success: None,
                message: "Payload Too Large",
                error: Value::from(format!("Request body exceeds {limit} bytes")),
                details: None,
            },
            TrackError::ServerMisconfigured { .. } => ErrorBody {
                success: None,
                message: "Internal Server Error",
                error: Value::from("Server configuration error"),
                details: None,
            },
            TrackError::UpstreamRejected { body, .. } => ErrorBody {
                success: Some(false),
                message: "Failed to track signup with FirstPromoter",
                error: upstream_message(body),
                details: Some(body.clone()),
            },
            TrackError::UpstreamUnreachable { .. } => ErrorBody {
                success: Some(false),
                message: "Failed to track signup with FirstPromoter",
                error: Value::from("No response received from FirstPromoter"),
                details: None,
            },
            TrackError::RequestSetupFailed { reason } => ErrorBody {
                success: Some(false),
                message: "Failed to track signup with FirstPromoter",
                error: Value::from(format!("Error setting up request: {reason}")),
                details: None,
            },
            TrackError::UnknownFailure { .. } => ErrorBody {
                success: Some(false),
                message: "Internal Server Error",
                error: Value::from("Unexpected error while tracking signup"),
                details: None,
            },
        }
    }
}

/// The upstream `message` field when it is a string, the whole body otherwise.
fn upstream_message(body: &Value) -> Value {
    match body.get("message") {
        Some(Value::String(message)) => Value::from(message.as_str()),
        _ => body.clone(),
    }
}

impl ResponseError for TrackError {
    fn status_code(&self) -> StatusCode {
        match self {
            TrackError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TrackError::MissingTrackingCookie | TrackError::MissingIdentity => {
                StatusCode::BAD_REQUEST
            }
            TrackError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            TrackError::UpstreamRejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            TrackError::ServerMisconfigured { .. }
            | TrackError::UpstreamUnreachable { .. }
            | TrackError::RequestSetupFailed { .. }
            | TrackError::UnknownFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
