use serde::Serialize;
use serde_json::Value;

pub const TRACKING_COOKIE: &str = "_fprom_tid";

/// Identity fields posted by the client app.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SignupBody {
    pub email: Option<String>,
    pub uid: Option<String>,
}

impl SignupBody {
    /// Lenient parse: each field is kept only if it is a string, so a
    /// mistyped field never hides a valid one. A body that is empty, not
    /// JSON, or not an object carries no identity.
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::default();
        }

        let value: Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Ignoring unparsable signup body: {}", e);
                return Self::default();
            }
        };

        let field = |name: &str| value.get(name).and_then(Value::as_str).map(String::from);
        Self {
            email: field("email"),
            uid: field("uid"),
        }
    }
}

/// A validated inbound signup: a tracking id and at least one identity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    pub tid: String,
    pub email: Option<String>,
    pub uid: Option<String>,
}

/// Body sent to the FirstPromoter signup tracking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingPayload {
    pub tid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl From<SignupRequest> for TrackingPayload {
    fn from(request: SignupRequest) -> Self {
        Self {
            tid: request.tid,
            email: request.email,
            uid: request.uid,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackSuccess {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "firstPromoterResponse")]
    pub first_promoter_response: Value,
}

impl TrackSuccess {
    pub fn new(first_promoter_response: Value) -> Self {
        Self {
            success: true,
            message: "Signup tracked successfully",
            first_promoter_response,
        }
    }
}
