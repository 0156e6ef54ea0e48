// Notification descriptors and the data they carry to click time

pub mod normalizer;
pub mod payload;

pub use normalizer::{normalize, DeliveryPath};
pub use payload::InboundPayload;

use serde::Serialize;
use serde_json::{Map, Value};

pub const OPEN_ACTION: &str = "open";
pub const CLOSE_ACTION: &str = "close";

/// Display-ready notification derived from an inbound payload
///
/// Serializes to the `NotificationOptions` object passed to
/// `registration.showNotification(title, options)`; the title travels separately.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDescriptor {
    #[serde(skip)]
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    /// Display slot; same chat, same tag
    pub tag: String,
    pub data: CarriedData,
    pub require_interaction: bool,
    pub actions: Vec<NotificationAction>,
    pub vibrate: Vec<u32>,
}

impl NotificationDescriptor {
    pub fn chat_id(&self) -> Option<&str> {
        self.data.chat_id.as_deref()
    }

    pub fn has_action(&self, id: &str) -> bool {
        self.actions.iter().any(|a| a.id == id)
    }

    /// Options object as JSON text, ready for `JSON.parse` on the host side
    pub fn options_json(&self) -> String {
        // Only strings, numbers, bools and JSON values inside; cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NotificationAction {
    #[serde(rename = "action")]
    pub id: String,
    #[serde(rename = "title")]
    pub label: String,
}

impl NotificationAction {
    pub fn open() -> Self {
        Self {
            id: OPEN_ACTION.to_string(),
            label: "Open Chat".to_string(),
        }
    }

    pub fn close() -> Self {
        Self {
            id: CLOSE_ACTION.to_string(),
            label: "Close".to_string(),
        }
    }
}

/// The notification's `data` object: the payload's data fields plus
/// `chatId`, `chatName` and a capture `timestamp`.
///
/// This is the only state that survives between display and click.
#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct CarriedData {
    #[serde(rename = "chatId", skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(rename = "chatName", skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarriedData {
    /// Merge the derived fields over a copy of the payload's data
    pub fn capture(
        data: &Map<String, Value>,
        chat_id: &str,
        chat_name: &str,
        now_ms: f64,
    ) -> Self {
        let mut extra = data.clone();
        extra.remove("chatId");
        extra.remove("chatName");
        extra.remove("timestamp");

        Self {
            chat_id: Some(chat_id.to_string()),
            chat_name: Some(chat_name.to_string()),
            timestamp: Some(now_ms),
            extra,
        }
    }

    /// Recover carried data at click time. Never fails: anything unreadable
    /// is treated as absent. Empty `chatId` counts as no chat.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut extra) = value else {
            return Self::default();
        };

        let chat_id = take_string(&mut extra, "chatId");
        let chat_name = take_string(&mut extra, "chatName");
        let timestamp = match extra.get("timestamp").and_then(Value::as_f64) {
            Some(ts) => {
                extra.remove("timestamp");
                Some(ts)
            }
            None => None,
        };

        Self {
            chat_id,
            chat_name,
            timestamp,
            extra,
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) => {
            let s = s.clone();
            map.remove(key);
            (!s.is_empty()).then_some(s)
        }
        _ => None,
    }
}
