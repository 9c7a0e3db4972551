/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Form API server entry point.
//!
//! A standalone Axum service receiving the website's contact and callback
//! forms and appending them to a Google spreadsheet.

use anyhow::{anyhow, Context};
use clap::Parser;
use contact_api::cli_args::{Mode, Opt};
use contact_api::config::Config;
use contact_api::routes;
use contact_api::script_template::ScriptTemplate;
use contact_api::state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    match Opt::parse().mode.unwrap_or(Mode::Serve) {
        Mode::Serve => serve().await,
        Mode::AppsScript(args) => {
            print!("{}", ScriptTemplate::from(args).render());
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = Config::from_env().map_err(|e| anyhow!(e))?;

    let state = AppState::new(&config);
    match state.backend.as_ref() {
        Some(backend) => tracing::info!("Forwarding submissions via {}", backend.name()),
        None => tracing::warn!("No spreadsheet backend configured, submissions will fail"),
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router().layer(cors).with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("Form API listening on {}", config.listen_addr);

    axum::serve(listener, app).await.context("server error")
}
