//! Grammar Match · backend host
//!
//! - Axum HTTP + WebSocket API over the rule/question matching engine
//! - Catalog from TOML, or the built-in modifier catalog
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   CATALOG_PATH  : path to TOML catalog ([[rules]] + [[questions]])
//!   LOG_LEVEL     : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT    : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use grammar_match::routes::build_router;
use grammar_match::state::AppState;
use grammar_match::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Load the catalog and build the initial mapping.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "grammar_match", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
