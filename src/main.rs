use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use dotenv::dotenv;
use signup_tracker::client::FirstPromoterClient;
use signup_tracker::config::{EnvConfig, ServerConfig};
use signup_tracker::routes;
use signup_tracker::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    if dotenv().is_err() {
        tracing::debug!("No .env file found, using process environment only");
    }

    let server = ServerConfig::load(&EnvConfig)?;
    let client = FirstPromoterClient::new().context("invalid FirstPromoter endpoint")?;
    let state = web::Data::new(AppState::new(Arc::new(EnvConfig), Arc::new(client)));

    tracing::info!("Listening on {}:{}", server.host, server.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::init)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await?;

    Ok(())
}
