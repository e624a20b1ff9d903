use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;

/// Largest request body a JSON endpoint accepts
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// JSON body extractor with strict rules: bounded size, exactly one
/// value, descriptive `400` messages. Unknown keys are rejected when the
/// target type uses `#[serde(deny_unknown_fields)]`.
#[derive(Debug)]
pub struct StrictJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|_| ApiError::bad_request(format!("body must not be larger than {MAX_BODY_BYTES} bytes")))?;
        decode(&bytes).map(StrictJson)
    }
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("body must not be empty"));
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = T::deserialize(&mut de).map_err(describe)?;
    de.end()
        .map_err(|_| ApiError::bad_request("body must only contain a single JSON value"))?;
    Ok(value)
}

fn describe(err: serde_json::Error) -> ApiError {
    let message = match err.classify() {
        Category::Syntax | Category::Io => format!(
            "body contains badly-formed JSON (at line {} column {})",
            err.line(),
            err.column()
        ),
        Category::Eof => "body contains badly-formed JSON".to_string(),
        Category::Data => {
            let text = err.to_string();
            match unknown_field(&text) {
                Some(field) => format!("body contains unknown key {field}"),
                None => format!("body contains incorrect JSON type ({text})"),
            }
        }
    };
    ApiError::bad_request(message)
}

/// serde reports ``unknown field `x`, expected ...``
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split('`').next()
}
