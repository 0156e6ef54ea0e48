// Notification click routing
// Decides what to do with a click; the worker carries the decision out

use url::{form_urlencoded, Url};

use crate::host::WindowTarget;
use crate::notification::{CarriedData, CLOSE_ACTION};

/// A click on a displayed notification
#[derive(Clone, Debug, PartialEq)]
pub struct ClickEvent {
    pub data: CarriedData,
    /// Pressed action id; None for a click on the notification body
    pub action: Option<String>,
}

impl ClickEvent {
    pub fn new(data: CarriedData, action: Option<String>) -> Self {
        Self {
            data,
            action: action.filter(|a| !a.is_empty()),
        }
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.data.chat_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_close(&self) -> bool {
        self.action.as_deref() == Some(CLOSE_ACTION)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteAction {
    /// Nothing beyond closing the notification
    Dismiss,
    /// Focus `windows[index]` and, with a chat id, tell it to open that chat
    FocusAndNotify {
        index: usize,
        chat_id: Option<String>,
    },
    OpenNew {
        url: String,
    },
}

/// Where a new window should land for this chat
pub fn target_url(chat_id: Option<&str>) -> String {
    match chat_id {
        Some(id) => {
            let encoded: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
            format!("/?chatId={}", encoded)
        }
        None => "/".to_string(),
    }
}

/// Compare parsed origins (scheme, host, port), not raw strings
pub fn same_origin(candidate_url: &str, origin: &str) -> bool {
    match (Url::parse(candidate_url), Url::parse(origin)) {
        (Ok(candidate), Ok(own)) => candidate.origin() == own.origin(),
        _ => false,
    }
}

/// Route a click against a window snapshot.
///
/// The first same-origin, focusable window in enumeration order wins; the
/// order is never changed.
pub fn route<W: WindowTarget>(
    event: &ClickEvent,
    windows: &[W],
    origin: &str,
    can_open_window: bool,
) -> RouteAction {
    if event.is_close() {
        return RouteAction::Dismiss;
    }

    let found = windows
        .iter()
        .position(|w| w.can_focus() && same_origin(&w.url(), origin));

    match found {
        Some(index) => RouteAction::FocusAndNotify {
            index,
            chat_id: event.chat_id().map(str::to_string),
        },
        None if can_open_window => RouteAction::OpenNew {
            url: target_url(event.chat_id()),
        },
        None => RouteAction::Dismiss,
    }
}
