use axum::body::Bytes;
use serde_json::Value;

use crate::error::AppError;

/// Accepts any JSON object. Nothing about its fields is checked.
pub fn parse_body(bytes: &Bytes) -> Result<Value, AppError> {
    let payload: Value = serde_json::from_slice(bytes).map_err(|_| AppError::MalformedPayload)?;

    if !payload.is_object() {
        return Err(AppError::MalformedPayload);
    }

    Ok(payload)
}
