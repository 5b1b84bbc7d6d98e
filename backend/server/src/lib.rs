//! Backend of the internship ("estágio") management system.
//!
//! All data lives in one Google Sheets document. This server reads it, filters
//! it and writes cells back, and keeps nothing of its own between requests.
//!
//!
//!
//! # Endpoints
//!
//! | method | path                     | token | purpose |
//! |--------|--------------------------|-------|---------|
//! | GET    | `/`                      | no    | health message |
//! | POST   | `/login`                 | no    | email + password, returns a token |
//! | GET    | `/filter-options`        | no    | select options for the search form |
//! | POST   | `/student-data`          | yes   | filtered student records with stats |
//! | POST   | `/update-grades`         | yes   | advisor grades and average for one record |
//! | POST   | `/complete-registration` | no    | company fills its own fields of one record |
//!
//! Every response uses the same envelope:
//! `{ success, data?, stats?, message?, token?, user? }`.
//!
//!
//!
//! # Request Flow
//! - Protected routes check the bearer token before anything else
//! - Each request reads the whole student tab, there is no cache
//! - Writes go out as a single batch after all columns resolved and the row was found
//! - Nothing is written when a required column is missing
//!
//!
//!
//! # Known Race
//!
//! There is no revision check between the read and the batch write. Two
//! updates of the same record at the same time both succeed and the sheet
//! keeps whichever write landed last for each cell.
//!
//!
//!
//! # Setup
//!
//! Environment (defaults in brackets):
//! - `SPREADSHEET_ID` (required)
//! - `RUST_PORT` [3000]
//! - `STUDENT_SHEET` [Página1], `LOGIN_SHEET` [Login]
//! - `ALLOWED_ORIGINS` [https://luisbastosgit.github.io], comma separated prefixes
//! - `TOKEN_TTL_HOURS` [8], `UPSTREAM_TIMEOUT_SECS` [10]
//! - `RUST_LOG` for log filtering
//!
//! Secrets, read from `/run/secrets/<NAME>` or the environment:
//! - `JWT_SECRET`
//! - `GOOGLE_CREDENTIALS`, the service account key JSON
//!
//! Run locally.
//! ```sh
//! RUST_LOG=info SPREADSHEET_ID=... JWT_SECRET=... GOOGLE_CREDENTIALS="$(cat key.json)" cargo run
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
    },
    middleware::from_fn_with_state,
    routing::{get, post},
};
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use sheets::SheetStore;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod error;
pub mod grades;
pub mod login;
pub mod models;
pub mod registration;
pub mod routes;
pub mod state;
pub mod students;
pub mod utils;

use auth::authenticate;
use config::Config;
use routes::{
    complete_registration_handler, filter_options_handler, hello_handler, login_handler,
    student_data_handler, update_grades_handler,
};
use state::AppState;

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading configuration...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::connect(config)?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = router(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

pub fn router<S: SheetStore>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route("/student-data", post(student_data_handler::<S>))
        .route("/update-grades", post(update_grades_handler::<S>))
        .route_layer(from_fn_with_state(state.clone(), authenticate::<S>));

    Router::new()
        .route("/", get(hello_handler))
        .route("/login", post(login_handler::<S>))
        .route("/filter-options", get(filter_options_handler::<S>))
        .route("/complete-registration", post(complete_registration_handler::<S>))
        .merge(protected)
        .layer(cors(&state.config.allowed_origins))
        .with_state(state)
}

/// Origins are allowed when they start with one of the configured prefixes.
fn cors(allowed_origins: &[String]) -> CorsLayer {
    let allowed = allowed_origins.to_vec();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                let allowed_origin = origin_allowed(&allowed, origin.as_bytes());
                if !allowed_origin {
                    warn!("Blocked CORS origin {origin:?}");
                }
                allowed_origin
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

fn origin_allowed(allowed: &[String], origin: &[u8]) -> bool {
    allowed
        .iter()
        .any(|prefix| origin.starts_with(prefix.as_bytes()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
