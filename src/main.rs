mod db;
mod error;
mod handlers;
mod models;
mod services;
mod state;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use services::grammers::GrammersConnector;
use services::registry::ClientRegistry;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .unwrap_or(8080);
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://app.db".to_string());

    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to initialize SQLite pool");
    let registry = Arc::new(ClientRegistry::new(Arc::new(GrammersConnector)));
    let app_state = web::Data::new(AppState::new(pool, registry));

    info!(port, "starting Telegram web client backend");

    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .route("/health", web::get().to(handlers::health_check))
            .route("/api/auth/register", web::post().to(handlers::auth::register))
            .route("/api/auth/login", web::post().to(handlers::auth::login))
            .route(
                "/api/telegram/accounts",
                web::post().to(handlers::telegram::create_account),
            )
            .route(
                "/api/telegram/accounts",
                web::get().to(handlers::telegram::list_accounts),
            )
            .route(
                "/api/telegram/accounts/{account_id}",
                web::delete().to(handlers::telegram::delete_account),
            )
            .route(
                "/api/telegram/accounts/{account_id}/auth",
                web::post().to(handlers::telegram::authenticate_account),
            )
            .route(
                "/api/telegram/accounts/{account_id}/chats",
                web::get().to(handlers::telegram::get_chats),
            )
            .route(
                "/api/telegram/accounts/{account_id}/chats/{chat_id}/messages",
                web::get().to(handlers::telegram::get_messages),
            )
            .route(
                "/api/telegram/accounts/{account_id}/logout",
                web::post().to(handlers::telegram::logout_account),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
