//! Outbound client for the FirstPromoter signup tracking API.
//!
//! One attempt per call: no retry, no timeout beyond reqwest's defaults.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::config::Credentials;
use crate::error::UpstreamError;
use crate::models::signup::TrackingPayload;

pub const FIRSTPROMOTER_SIGNUP_URL: &str = "https://v2.firstpromoter.com/api/v2/track/signup";

const ACCOUNT_ID_HEADER: &str = "Account-ID";

/// Sends one tracking payload upstream and returns the upstream's JSON body.
#[async_trait]
pub trait TrackingClient: Send + Sync {
    async fn track_signup(
        &self,
        credentials: &Credentials,
        payload: &TrackingPayload,
    ) -> Result<Value, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct FirstPromoterClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl FirstPromoterClient {
    pub fn new() -> Result<Self, url::ParseError> {
        Self::with_endpoint(FIRSTPROMOTER_SIGNUP_URL)
    }

    /// Points the client at a different signup endpoint.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: Url::parse(endpoint)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn headers(credentials: &Credentials) -> Result<HeaderMap, UpstreamError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", credentials.api_token))
            .map_err(|_| UpstreamError::RequestSetup {
                reason: "API token is not a valid header value".to_string(),
            })?;
        let account_id = HeaderValue::from_str(&credentials.account_id).map_err(|_| {
            UpstreamError::RequestSetup {
                reason: "account id is not a valid header value".to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCOUNT_ID_HEADER, account_id);
        Ok(headers)
    }
}

#[async_trait]
impl TrackingClient for FirstPromoterClient {
    async fn track_signup(
        &self,
        credentials: &Credentials,
        payload: &TrackingPayload,
    ) -> Result<Value, UpstreamError> {
        let headers = Self::headers(credentials)?;

        debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .json(payload)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| UpstreamError::Other {
            reason: format!("failed to read tracking API response: {e}"),
        })?;
        let body = parse_body(&bytes);

        if status.is_success() {
            info!("Tracking API accepted signup with HTTP {}", status.as_u16());
            Ok(body)
        } else {
            Err(UpstreamError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn classify_send_error(e: reqwest::Error) -> UpstreamError {
    if e.is_builder() {
        UpstreamError::RequestSetup {
            reason: e.to_string(),
        }
    } else if e.is_connect() || e.is_timeout() || e.is_request() {
        UpstreamError::Unreachable {
            reason: e.to_string(),
        }
    } else {
        UpstreamError::Other {
            reason: e.to_string(),
        }
    }
}

/// JSON when possible, raw text otherwise, `null` for an empty body.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
