// Inbound push payloads
// Untrusted input: every field is optional and decoding never fails

use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InboundPayload {
    pub notification_title: Option<String>,
    pub notification_body: Option<String>,
    /// Free-form `data` object, kept verbatim for carrying to click time
    pub data: Map<String, Value>,
    /// Provider-assigned message id (`fcmMessageId` / `messageId`)
    pub message_id: Option<String>,
}

impl InboundPayload {
    /// Decode push data text. Unparsable text gives an empty payload.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                log::error!("Error parsing push data: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let notification = value.get("notification");

        Self {
            notification_title: notification.and_then(|n| non_empty_str(n.get("title"))),
            notification_body: notification.and_then(|n| non_empty_str(n.get("body"))),
            data: value
                .get("data")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            message_id: non_empty_str(value.get("fcmMessageId"))
                .or_else(|| non_empty_str(value.get("messageId"))),
        }
    }

    /// A `data` field, only if it is a non-empty string
    pub fn data_str(&self, key: &str) -> Option<&str> {
        match self.data.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Strict: only the exact string `"true"` marks a group chat
    pub fn is_group(&self) -> bool {
        matches!(self.data.get("isGroup"), Some(Value::String(s)) if s == "true")
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
