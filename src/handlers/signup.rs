use crate::client::TrackingClient;
use crate::config::{ConfigProvider, Credentials};
use crate::error::TrackError;
use crate::models::signup::{SignupBody, SignupRequest, TrackSuccess, TrackingPayload};

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Checks the cookie and body, in that order.
pub fn validate(tid: Option<String>, body: SignupBody) -> Result<SignupRequest, TrackError> {
    let tid = present(tid).ok_or(TrackError::MissingTrackingCookie)?;
    let email = present(body.email);
    let uid = present(body.uid);

    if email.is_none() && uid.is_none() {
        return Err(TrackError::MissingIdentity);
    }

    Ok(SignupRequest { tid, email, uid })
}

/// Validates the signup, loads credentials and forwards it upstream once.
pub async fn track_signup(
    tid: Option<String>,
    body: SignupBody,
    config: &dyn ConfigProvider,
    client: &dyn TrackingClient,
) -> Result<TrackSuccess, TrackError> {
    let request = validate(tid, body)?;
    let credentials = Credentials::load(config)?;
    let payload = TrackingPayload::from(request);

    tracing::info!(
        has_email = payload.email.is_some(),
        has_uid = payload.uid.is_some(),
        "Forwarding signup to FirstPromoter"
    );

    let upstream = client.track_signup(&credentials, &payload).await?;
    Ok(TrackSuccess::new(upstream))
}
