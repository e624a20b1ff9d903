use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person who has signed in at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    #[serde(rename = "name")]
    #[sqlx(rename = "name")]
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Case-sensitive comparison, emails are stored as the verifier returned them
    pub fn has_email(&self, email: &str) -> bool {
        self.email == email
    }
}
