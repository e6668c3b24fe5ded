use clap::{Parser, Subcommand, ValueEnum, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_DB_ENDPOINT: &str = "mem://";
const DEFAULT_DB_NAMESPACE: &str = "second_brain";
const DEFAULT_DB_NAME: &str = "brain";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_LOG_FILTER: &str = "info";

const REMOTE_SCHEMES: &[&str] = &["ws://", "wss://", "http://", "https://"];

#[derive(Parser, Debug)]
#[command(name = "brain-mcpd", version, about = "Second brain MCP daemon.")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,

    /// `SurrealDB` endpoint, e.g. `mem://` or `ws://host:8000`.
    #[arg(long, env = "BRAIN_DB_ENDPOINT", default_value = DEFAULT_DB_ENDPOINT)]
    db_endpoint: String,

    #[arg(long, env = "BRAIN_DB_NAMESPACE", default_value = DEFAULT_DB_NAMESPACE)]
    db_namespace: String,

    #[arg(long, env = "BRAIN_DB_NAME", default_value = DEFAULT_DB_NAME)]
    db_name: String,

    #[arg(long, env = "BRAIN_DB_USERNAME")]
    db_username: Option<String>,

    #[arg(long, env = "BRAIN_DB_PASSWORD")]
    db_password: Option<String>,

    #[arg(long, env = "BRAIN_MCP_TRANSPORT", value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    #[arg(long, env = "BRAIN_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "BRAIN_MCP_HTTP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    http_stateful: bool,

    /// Tracing filter directive. `RUST_LOG` takes precedence when set.
    #[arg(long, env = "BRAIN_LOG", default_value = DEFAULT_LOG_FILTER)]
    log_filter: String,
}

/// What the daemon does once the store is connected.
#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Serve the MCP tools (default).
    #[default]
    Serve,
    /// Insert the built-in topic registry and exit.
    SeedTopics,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct BrainConfig {
    pub command: Command,
    pub db_endpoint: String,
    pub db_namespace: String,
    pub db_name: String,
    pub credentials: Option<Credentials>,
    pub transport: Transport,
    pub mcp_http_addr: SocketAddr,
    pub http_stateful: bool,
    pub log_filter: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl BrainConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    pub fn is_remote(&self) -> bool {
        is_remote_endpoint(&self.db_endpoint)
    }
}

fn is_remote_endpoint(endpoint: &str) -> bool {
    REMOTE_SCHEMES
        .iter()
        .any(|scheme| endpoint.starts_with(scheme))
}

fn require_non_blank(name: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidSetting { name, value });
    }
    Ok(value.trim().to_string())
}

impl TryFrom<CliArgs> for BrainConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let db_endpoint = require_non_blank("BRAIN_DB_ENDPOINT", args.db_endpoint)?;
        let db_namespace = require_non_blank("BRAIN_DB_NAMESPACE", args.db_namespace)?;
        let db_name = require_non_blank("BRAIN_DB_NAME", args.db_name)?;

        let db_username = args.db_username.filter(|value| !value.trim().is_empty());
        let db_password = args.db_password.filter(|value| !value.trim().is_empty());

        let credentials = match (db_username, db_password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (Some(_), None) => return Err(ConfigError::MissingSetting("BRAIN_DB_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::MissingSetting("BRAIN_DB_USERNAME")),
            (None, None) => None,
        };

        if credentials.is_none() && is_remote_endpoint(&db_endpoint) {
            return Err(ConfigError::MissingSetting("BRAIN_DB_USERNAME"));
        }

        Ok(Self {
            command: args.command.unwrap_or_default(),
            db_endpoint,
            db_namespace,
            db_name,
            credentials,
            transport: args.transport,
            mcp_http_addr: args.mcp_http_addr,
            http_stateful: args.http_stateful,
            log_filter: args.log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            command: None,
            db_endpoint: DEFAULT_DB_ENDPOINT.to_string(),
            db_namespace: DEFAULT_DB_NAMESPACE.to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            db_username: None,
            db_password: None,
            transport: Transport::Stdio,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            http_stateful: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    #[test]
    fn defaults_to_in_memory_stdio_serve() {
        let config = BrainConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.command, Command::Serve);
        assert_eq!(config.transport, Transport::Stdio);
        assert_eq!(config.db_endpoint, "mem://");
        assert!(!config.is_remote());
        assert!(config.credentials.is_none());
    }

    #[test]
    fn credentials_must_come_in_pairs() {
        let mut args = base_args();
        args.db_username = Some("root".to_string());

        let err = BrainConfig::try_from(args).expect_err("password is missing");
        assert!(matches!(err, ConfigError::MissingSetting("BRAIN_DB_PASSWORD")));
    }

    #[test]
    fn remote_endpoint_requires_credentials() {
        let mut args = base_args();
        args.db_endpoint = "ws://127.0.0.1:8000".to_string();
        assert!(BrainConfig::try_from(args).is_err());

        let mut args = base_args();
        args.db_endpoint = "ws://127.0.0.1:8000".to_string();
        args.db_username = Some("root".to_string());
        args.db_password = Some("secret".to_string());
        let config = BrainConfig::try_from(args).expect("config should parse");
        assert!(config.is_remote());
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn blank_namespace_is_invalid() {
        let mut args = base_args();
        args.db_namespace = "  ".to_string();

        let err = BrainConfig::try_from(args).expect_err("blank namespace");
        assert_eq!(err.to_string(), "invalid BRAIN_DB_NAMESPACE value:   ");
    }

    #[test]
    fn parses_seed_topics_subcommand() {
        let args = CliArgs::try_parse_from(["brain-mcpd", "--transport", "http", "seed-topics"])
            .expect("args should parse");
        let config = BrainConfig::try_from(args).expect("config should parse");
        assert_eq!(config.command, Command::SeedTopics);
        assert_eq!(config.transport, Transport::Http);
    }
}
