//! JSON API for creating surveys, collecting their responses and running
//! graded quizzes over them.
//!
//! Surveys, responses and quiz tables live in a Supabase project (PostgREST)
//! or, for local runs and tests, in process memory. Pick the backend with
//! `STORE_BACKEND`.
//!
//! | Method   | Path                                              |
//! |----------|---------------------------------------------------|
//! | `GET`    | `/`                                               |
//! | `GET`    | `/api/surveys`                                    |
//! | `POST`   | `/api/surveys`                                    |
//! | `GET`    | `/api/surveys/:id`                                |
//! | `DELETE` | `/api/surveys/:id`                                |
//! | `GET`    | `/api/surveys/:id/responses`                      |
//! | `POST`   | `/api/surveys/:id/responses`                      |
//! | `GET`    | `/api/surveys/:id/stats`                          |
//! | `POST`   | `/api/quizzes`                                    |
//! | `GET`    | `/api/quizzes/:id`                                |
//! | `DELETE` | `/api/quizzes/:id`                                |
//! | `GET`    | `/api/quizzes/:id/attempts`                       |
//! | `POST`   | `/api/quizzes/:id/attempts`                       |
//! | `POST`   | `/api/quizzes/:id/attempts/:attempt_id/submit`    |
//! | `GET`    | `/api/quizzes/:id/attempts/:attempt_id/responses` |
//! | `POST`   | `/api/quizzes/:id/responses/:response_id/grade`   |
//! | `GET`    | `/api/quizzes/:id/analytics`                      |
//! | `GET`    | `/api/quizzes/:id/whitelist`                      |
//! | `POST`   | `/api/quizzes/:id/whitelist`                      |
//! | `GET`    | `/api/quizzes/:id/whitelist/:wallet`              |
//! | `DELETE` | `/api/quizzes/:id/whitelist/:wallet`              |
//! | `GET`    | `/api/quizzes/:id/special-surveys`                |
//! | `POST`   | `/api/special-surveys`                            |
//! | `GET`    | `/api/special-surveys/:id/access/:wallet`         |
//! | `GET`    | `/api/health/store`                               |
//!
//! Every route answers with `{ "success": true, "data": ... }` or
//! `{ "success": false, "error": "...", "kind": "..." }`.
//!
//! [`wallet`] holds the client-side wallet connection state machine and the
//! Solana address check the quiz routes apply to participant, creator and
//! grader wallets.

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

pub mod controllers;
pub mod db;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod wallet;

use controllers::health_controllers::root::START_TIME;
use db::connection::init_store;
use utils::config::Config;

pub async fn start_server() {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("survey_api=info,tower_http=info"));
    fmt().with_env_filter(filter).init();

    Lazy::force(&START_TIME);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let state = match init_store(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize store: {e}");
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let cors = match &config.cors_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => cors.allow_origin(origin),
            Err(_) => {
                error!("Failed to parse CORS origin: {origin}");
                std::process::exit(1);
            }
        },
        None => cors.allow_origin(Any),
    };

    let app = routes::app(state).layer(cors);

    let listener = match TcpListener::bind(config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {e}", config.server_addr);
            std::process::exit(1);
        }
    };
    info!("Server running at http://{}", config.server_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shut down");
}

async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
