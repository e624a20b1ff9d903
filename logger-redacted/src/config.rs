// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Run every formatted line through the PII redactor
    pub redaction_enabled: bool,
    /// JSON lines instead of the human readable development format
    pub json_output: bool,
    /// Default filter directives when `RUST_LOG` is not set
    pub log_level: String,
}

impl LoggerConfig {
    /// Development defaults: pretty output, debug for our crates
    pub fn development() -> Self {
        Self {
            redaction_enabled: true,
            json_output: false,
            log_level: "folio_server=debug,auth_gateway=debug,tower_http=info,sqlx=warn".to_string(),
        }
    }

    /// Production defaults: JSON output, info level
    pub fn production() -> Self {
        Self {
            redaction_enabled: true,
            json_output: true,
            log_level: "info,sqlx=warn".to_string(),
        }
    }

    /// Pick defaults from the deployment environment name
    pub fn for_env(env: &str) -> Self {
        if env == "development" {
            Self::development()
        } else {
            Self::production()
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::development()
    }
}
