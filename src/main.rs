//! Matchango · Soccer Tactics Quiz Backend
//!
//! - Axum HTTP API for a single operator authoring quiz questions
//! - OpenAI integration for question and position generation
//! - Google Sheets sink for validated questions
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                  : u16 (default 3000)
//!   OPENAI_API_KEY        : enables generation if present
//!   OPENAI_BASE_URL       : default "https://api.openai.com/v1"
//!   OPENAI_MODEL          : default "gpt-4o"
//!   SHEETS_SPREADSHEET_ID : enables the question bank sink (with the token)
//!   SHEETS_ACCESS_TOKEN   : OAuth bearer token for the Sheets API
//!   QUIZ_CONFIG_PATH      : path to TOML config (prompt overrides)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

mod telemetry;
mod util;
mod errors;
mod domain;
mod config;
mod catalog;
mod prompt;
mod extract;
mod openai;
mod render;
mod sheets;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (session, OpenAI client, Sheets sink).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "matchango_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
