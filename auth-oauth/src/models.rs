use serde::{Deserialize, Serialize};

/// Claims extracted from a verified credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedClaim {
    pub audience: String,
    pub issuer: String,
    pub email: String,
    pub name: String,
}

/// Body of Google's `tokeninfo` response; only the fields we use
#[derive(Debug, Deserialize)]
pub struct TokenInfoResponse {
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub iss: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl From<TokenInfoResponse> for VerifiedClaim {
    fn from(info: TokenInfoResponse) -> Self {
        Self {
            audience: info.aud,
            issuer: info.iss,
            email: info.email,
            name: info.name,
        }
    }
}
