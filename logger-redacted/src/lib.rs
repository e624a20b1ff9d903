//! Structured logging with automatic PII redaction
//!
//! Every formatted log line is passed through a [`PiiRedactor`] before it is
//! written, so email addresses and identity tokens never reach the log sink
//! in clear text, whatever the call site passed as a field.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: user@example.com → EMAIL[hash] (or u***@e***)
//! - **JWTs**: eyJ... → [JWT REDACTED]
//! - **Query tokens**: ?id_token=... → ?id_token=[REDACTED]
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig};
//!
//! init_tracing(&LoggerConfig::for_env("production")).unwrap();
//! tracing::info!("User john.doe@example.com logged in");
//! // Output: "User EMAIL[q1w2e3r4t5y=] logged in"
//! ```
pub mod redactor;
pub mod config;

pub use redactor::*;
pub use config::*;

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)
            .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?,
    };

    let redactor = config
        .redaction_enabled
        .then(|| Arc::new(PiiRedactor::default()));
    let writer = RedactingMakeWriter::new(io::stdout, redactor);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.json_output {
        registry
            .with(fmt::layer().json().with_target(false).with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer),
            )
            .try_init()
    };

    installed.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}

/// `MakeWriter` that redacts each formatted event before forwarding it
#[derive(Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
    redactor: Option<Arc<PiiRedactor>>,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, redactor: Option<Arc<PiiRedactor>>) -> Self {
        Self { inner, redactor }
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            redactor: self.redactor.clone(),
        }
    }
}

pub struct RedactingWriter<W> {
    inner: W,
    redactor: Option<Arc<PiiRedactor>>,
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.redactor {
            Some(redactor) => {
                let line = String::from_utf8_lossy(buf);
                self.inner.write_all(redactor.redact(&line).as_bytes())?;
                // The caller's bytes were consumed even though we wrote a different amount
                Ok(buf.len())
            }
            None => self.inner.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
