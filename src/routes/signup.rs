use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use uuid::Uuid;

use crate::error::TrackError;
use crate::handlers::signup::track_signup;
use crate::models::signup::{SignupBody, TRACKING_COOKIE};
use crate::state::AppState;

/// Largest signup body accepted, matching actix-web's default payload limit.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Reads the body here rather than through the `Bytes` extractor so an
/// oversized body still gets a JSON error.
async fn read_body(payload: web::Payload) -> Result<SignupBody, TrackError> {
    match payload.to_bytes_limited(MAX_BODY_BYTES).await {
        Ok(Ok(bytes)) => Ok(SignupBody::from_slice(&bytes)),
        Ok(Err(e)) => Err(TrackError::UnknownFailure {
            reason: format!("failed to read request body: {e}"),
        }),
        Err(_) => Err(TrackError::PayloadTooLarge {
            limit: MAX_BODY_BYTES,
        }),
    }
}

#[tracing::instrument(name = "Tracking signup", skip_all, fields(request_id = %Uuid::new_v4()))]
async fn signup(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> HttpResponse {
    let tid = req.cookie(TRACKING_COOKIE).map(|c| c.value().to_string());

    let result = match read_body(payload).await {
        Ok(body) => track_signup(tid, body, state.config.as_ref(), state.client.as_ref()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(success) => HttpResponse::Ok().json(success),
        Err(e) => {
            if matches!(
                e,
                TrackError::MissingTrackingCookie
                    | TrackError::MissingIdentity
                    | TrackError::PayloadTooLarge { .. }
            ) {
                tracing::warn!(kind = e.kind(), "Signup rejected: {}", e);
            } else {
                tracing::error!(kind = e.kind(), "Signup tracking failed: {}", e);
            }
            e.error_response()
        }
    }
}

async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    tracing::warn!("{} {} is not allowed", req.method(), req.path());
    TrackError::MethodNotAllowed.error_response()
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/track-signup")
            .route(web::post().to(signup))
            .default_service(web::to(method_not_allowed)),
    );
}
