use regex::Regex;
use lazy_static::lazy_static;
use sha2::{Sha256, Digest};
use base64::{Engine as _, engine::general_purpose};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern is valid");
    // Compact JWS: three base64url segments, header always starts with `eyJ`
    static ref JWT_REGEX: Regex = Regex::new(r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*")
        .expect("jwt pattern is valid");
    static ref QUERY_TOKEN_REGEX: Regex = Regex::new(r"(?i)(id_token|token|access_token)=[^&\s]+")
        .expect("query token pattern is valid");
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_tokens: bool,
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_tokens: true,
            hash_for_correlation: true,
        }
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Tokens first: a JWT payload never contains `@`, but a query string might
        if self.config.redact_tokens {
            result = self.redact_tokens(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        result
    }

    /// Redact a single email address value (for structured fields)
    pub fn redact_email(&self, email: &str) -> String {
        if self.config.hash_for_correlation {
            return format!("EMAIL[{}]", self.hash_value(email));
        }
        mask_email(email)
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX.replace_all(text, |caps: &regex::Captures| {
            self.redact_email(&caps[0])
        }).to_string()
    }

    fn redact_tokens(&self, text: &str) -> String {
        let text = QUERY_TOKEN_REGEX.replace_all(text, "$1=[REDACTED]");
        JWT_REGEX.replace_all(&text, "[JWT REDACTED]").to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD.encode(result.get(..8).unwrap_or_default()) // Use first 8 bytes for shorter hash
    }
}

/// `alice@example.com` -> `a***@e***`
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            let domain_head = domain.chars().next().map(String::from).unwrap_or_default();
            format!("{head}***@{domain_head}***")
        }
        None => "***@***".to_string(),
    }
}
