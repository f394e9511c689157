//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the CMS REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `cms-run` binary serves the same
//! router.

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use cms_core::{
    config::{commit_author_from_env_values, pages_dir_from_env_value},
    constants::DEFAULT_CONTENT_ROOT,
    CoreConfig,
};

/// Main entry point for the CMS REST API server
///
/// # Environment Variables
/// - `CMS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CMS_CONTENT_ROOT`: Directory holding one git repository per site (default: "content_repos")
/// - `CMS_PAGES_DIR`: Pages directory inside each repository (default: "content/pages")
/// - `CMS_AUTHOR_NAME` / `CMS_AUTHOR_EMAIL`: Commit author for saves
/// - `CMS_ACCESS_TOKEN`: Bearer token required on every route except `/health`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the access token is missing or the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("cms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let access_token = std::env::var("CMS_ACCESS_TOKEN").unwrap_or_default();
    if access_token.trim().is_empty() {
        anyhow::bail!("CMS_ACCESS_TOKEN must be set");
    }

    let content_root = std::env::var("CMS_CONTENT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONTENT_ROOT));
    let author = commit_author_from_env_values(
        std::env::var("CMS_AUTHOR_NAME").ok(),
        std::env::var("CMS_AUTHOR_EMAIL").ok(),
    )?;
    let cfg = CoreConfig::new(
        content_root,
        &pages_dir_from_env_value(std::env::var("CMS_PAGES_DIR").ok()),
        author,
    )?;

    tracing::info!(
        "-- Starting CMS REST API on {} (content root {})",
        addr,
        cfg.content_root().display()
    );

    let app = router(AppState::from_config(&cfg, access_token.trim()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
