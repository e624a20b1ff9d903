use auth_gateway::GatewayConfig;
use clap::Parser;
use config::{Config, Environment, File};
use error_common::{FolioError, Result};
use serde::{Deserialize, Serialize};

/// Folio HTTP Server
#[derive(Parser, Debug, Default)]
#[command(name = "folio-server")]
#[command(about = "Personal website with Google sign-in")]
pub struct Args {
    /// API server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Environment (development|staging|production)
    #[arg(long)]
    pub env: Option<String>,

    /// Postgres DSN
    #[arg(long, env = "DATABASE_URL")]
    pub dsn: Option<String>,

    /// Google client ID for oauth
    #[arg(long = "gclientid")]
    pub google_client_id: Option<String>,

    /// Email of the administrator account
    #[arg(long)]
    pub admin_email: Option<String>,

    /// Configuration file path (toml, yaml or json)
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Postgres,
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default)]
    pub dsn: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default)]
    pub session_backend: SessionBackend,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_cleanup_interval_secs")]
    pub session_cleanup_interval_secs: u64,
    #[serde(default = "default_gateway")]
    pub gateway: GatewayConfig,
}

fn default_port() -> u16 {
    4000
}

fn default_env() -> String {
    "development".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

fn default_gateway() -> GatewayConfig {
    GatewayConfig::new("", "")
}

impl Settings {
    /// Settings for tests and local tooling, no file or environment involved
    pub fn new(gateway: GatewayConfig) -> Self {
        Self {
            port: default_port(),
            env: default_env(),
            dsn: String::new(),
            static_dir: default_static_dir(),
            session_backend: SessionBackend::Memory,
            redis_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            session_cleanup_interval_secs: default_cleanup_interval_secs(),
            gateway,
        }
    }

    /// Merge config file, `FOLIO__*` environment variables and CLI flags,
    /// later sources winning
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("folio").required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("FOLIO").prefix_separator("__").separator("__"))
            .set_override_option("port", args.port.map(i64::from))
            .and_then(|b| b.set_override_option("env", args.env.clone()))
            .and_then(|b| b.set_override_option("dsn", args.dsn.clone()))
            .and_then(|b| b.set_override_option("gateway.google_client_id", args.google_client_id.clone()))
            .and_then(|b| b.set_override_option("gateway.admin_email", args.admin_email.clone()))
            .and_then(|b| b.build())
            .and_then(|c| c.try_deserialize())
            .map_err(|e| FolioError::config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway.google_client_id.trim().is_empty() {
            return Err(FolioError::config("gclientid is not provided"));
        }
        // Only a fully in-memory development setup may run without a database
        if self.session_backend != SessionBackend::Memory && self.dsn.trim().is_empty() {
            return Err(FolioError::config("dsn is not provided"));
        }
        if self.gateway.admin_email.trim().is_empty() {
            return Err(FolioError::config("admin email is not provided"));
        }
        if self.session_backend == SessionBackend::Redis && self.redis_url.is_none() {
            return Err(FolioError::config("redis_url is required for the redis session backend"));
        }
        if self.request_timeout_secs == 0 {
            return Err(FolioError::config("request_timeout_secs must be at least 1"));
        }
        if self.session_cleanup_interval_secs == 0 {
            return Err(FolioError::config("session_cleanup_interval_secs must be at least 1"));
        }
        self.gateway
            .validate()
            .map_err(|e| FolioError::config(e.to_string()))
    }
}
