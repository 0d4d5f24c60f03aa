//! Message envelope codec
//!
//! Outbound notifications are single-line JSON objects; inbound frames are
//! JSON objects dispatched on their `type` field.

use serde_json::Value;

use crate::error::DecodeError;
use crate::types::{ClientRequest, Notification};

/// Hint returned to the browser when a frame cannot be decoded
pub const FORMAT_HINT: &str =
    r#"Please send data in JSON format. Example: {"type":"open","url":"..."}"#;

/// Encode a notification as one JSON line
///
/// serde_json escapes every control character, so the output never contains
/// a raw newline and always fits in a single text frame.
pub fn encode(notification: &Notification) -> String {
    match serde_json::to_string(notification) {
        Ok(json) => json,
        Err(e) => {
            format!(r#"{{"type":"error","message":"failed to encode notification: {e}"}}"#)
        }
    }
}

/// Decode an inbound text frame into a request
pub fn decode(text: &str) -> Result<ClientRequest, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut fields) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let request = match fields.remove("type") {
        Some(Value::String(kind)) if kind == "open" => {
            let url = match fields.remove("url") {
                Some(Value::String(url)) => url.trim().to_string(),
                _ => String::new(),
            };
            ClientRequest::Open { url }
        }
        Some(Value::String(kind)) if kind == "ping" => ClientRequest::Ping,
        kind => ClientRequest::Unknown { kind },
    };

    Ok(request)
}

/// Render an unrecognised `type` value for the error notification
pub fn describe_kind(kind: Option<&Value>) -> String {
    match kind {
        Some(Value::String(s)) => format!("'{s}'"),
        Some(other) => other.to_string(),
        None => "None".to_string(),
    }
}
