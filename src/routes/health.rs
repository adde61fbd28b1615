use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::config::Credentials;
use crate::state::AppState;

#[get("/ping")]
async fn ping() -> impl Responder {
    HttpResponse::Ok().body("pong")
}

/// Ready once both FirstPromoter credentials are configured.
#[get("/ready")]
async fn ready(state: web::Data<AppState>) -> impl Responder {
    match Credentials::load(state.config.as_ref()) {
        Ok(_) => HttpResponse::Ok().json(json!({ "ready": true })),
        Err(e) => {
            tracing::warn!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({ "ready": false }))
        }
    }
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(ping).service(ready);
}
