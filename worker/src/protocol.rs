// Structured messages exchanged with application windows

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Worker -> window
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum WindowMessage {
    /// Ask an already-open window to navigate to a chat without reloading
    #[serde(rename = "OPEN_CHAT")]
    OpenChat {
        #[serde(rename = "chatId")]
        chat_id: String,
    },
}

/// Window -> worker
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ControlMessage {
    /// Activate the waiting worker immediately
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}

impl ControlMessage {
    /// Returns None for anything that isn't a known control message
    pub fn parse(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}
