//! Daemon entry point for the second brain MCP server.
//!
//! Loads configuration from CLI arguments and the environment, connects the
//! store once, and either serves the MCP tools or seeds the topic registry.

mod config;

use brain_core::control::BrainControlPlane;
use brain_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{BrainConfig, Command, Transport};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = BrainConfig::from_args()?;
    init_tracing(&config.log_filter);

    let control = connect(&config).await?;
    match config.command {
        Command::Serve => serve(control, &config).await,
        Command::SeedTopics => {
            let report = control.seed_default_topics().await?;
            info!(created = report.created, skipped = report.skipped, "topic seeding finished");
            Ok(())
        }
    }
}

/// Logs go to stderr so the stdio transport owns stdout.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn connect(config: &BrainConfig) -> Result<BrainControlPlane<Any>, BoxError> {
    let db: Surreal<Any> = any::connect(config.db_endpoint.as_str()).await?;

    if let Some(credentials) = &config.credentials {
        db.signin(Root {
            username: credentials.username.as_str(),
            password: credentials.password.as_str(),
        })
        .await?;
    }

    db.use_ns(config.db_namespace.as_str())
        .use_db(config.db_name.as_str())
        .await?;

    let control = BrainControlPlane::new(db);
    control.store().ensure_schema().await?;
    info!(
        endpoint = %config.db_endpoint,
        namespace = %config.db_namespace,
        database = %config.db_name,
        remote = config.is_remote(),
        "store connected"
    );
    Ok(control)
}

async fn serve(control: BrainControlPlane<Any>, config: &BrainConfig) -> Result<(), BoxError> {
    match config.transport {
        Transport::Stdio => serve_stdio(control).await,
        Transport::Http => {
            let http = McpHttpServerConfig::new(config.mcp_http_addr)
                .with_stateful_mode(config.http_stateful);
            serve_streamable_http(control, http).await
        }
    }
}
