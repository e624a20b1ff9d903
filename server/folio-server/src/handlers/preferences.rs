use auth_gateway::{Session, DARK_MODE};
use axum::response::Json;
use serde_json::{json, Value};

/// PUT /toggledark
pub async fn toggle_dark(session: Session) -> Json<Value> {
    let is_dark = session.get_bool(DARK_MODE).unwrap_or(false);
    session.put(DARK_MODE, !is_dark);
    Json(json!({ "message": "updated" }))
}
