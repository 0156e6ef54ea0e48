// Event dispatcher
// One handler per event type. Every host failure is caught and logged here;
// handlers always complete so the host's waitUntil never sees a rejection.

use serde_json::Value;

use crate::config::WorkerConfig;
use crate::host::{Dismissible, Host};
use crate::notification::{normalize, DeliveryPath, InboundPayload};
use crate::protocol::{ControlMessage, WindowMessage};
use crate::router::{route, ClickEvent, RouteAction};

#[derive(Clone, Debug, PartialEq)]
pub enum DisplayOutcome {
    Shown { tag: String },
    /// The host refused to display (permission revoked, bad icon, ...)
    Failed { tag: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    Dismissed,
    /// `index` is the window's position in the click-time snapshot
    Focused { index: usize, notified: bool },
    Opened { url: String },
    OpenFailed { url: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControlOutcome {
    Activated,
    ActivationFailed,
    Ignored,
}

/// Push worker: configuration plus the host it drives.
///
/// Built once at worker start and shared by every event listener.
pub struct Worker<H: Host> {
    config: WorkerConfig,
    host: H,
}

impl<H: Host> Worker<H> {
    pub fn new(config: WorkerConfig, host: H) -> Self {
        Self { config, host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Messaging provider's background-message callback
    pub async fn on_background_message(&self, payload: &Value) -> DisplayOutcome {
        log::info!("📨 Received background message");
        log::debug!("Background payload: {}", payload);

        let payload = InboundPayload::from_value(payload);
        self.display(&payload, DeliveryPath::BackgroundMessage).await
    }

    /// Raw `push` event. `data` is the push data as text, if any.
    pub async fn on_push(&self, data: Option<&str>) -> DisplayOutcome {
        log::info!("📨 Push event received");

        let payload = match data {
            Some(text) => InboundPayload::from_json(text),
            None => InboundPayload::default(),
        };
        log::debug!("Push payload: {:?}", payload);

        self.display(&payload, DeliveryPath::Push).await
    }

    async fn display(&self, payload: &InboundPayload, path: DeliveryPath) -> DisplayOutcome {
        let descriptor = normalize(payload, path, &self.config, self.host.now_ms());
        let tag = descriptor.tag.clone();

        log::info!(
            "Creating notification for chat: {}",
            descriptor.data.chat_name.as_deref().unwrap_or_default()
        );

        match self.host.show_notification(&descriptor).await {
            Ok(()) => {
                log::info!("✅ Notification shown ({:?}, tag {})", path, tag);
                DisplayOutcome::Shown { tag }
            }
            Err(e) => {
                log::error!("❌ Failed to show notification ({:?}): {}", path, e);
                DisplayOutcome::Failed { tag }
            }
        }
    }

    /// `notificationclick`. The notification is always closed first.
    pub async fn on_notification_click(
        &self,
        notification: &impl Dismissible,
        event: ClickEvent,
    ) -> ClickOutcome {
        notification.dismiss();

        log::info!(
            "🔔 Notification clicked (action: {:?}, chat: {:?})",
            event.action,
            event.chat_id()
        );

        if event.is_close() {
            log::info!("Notification closed by user");
            return ClickOutcome::Dismissed;
        }

        let windows = match self.host.match_windows().await {
            Ok(windows) => windows,
            Err(e) => {
                log::warn!("⚠️ Could not enumerate windows, treating as none: {}", e);
                Vec::new()
            }
        };
        let origin = self.host.origin();

        // Windows can close between enumeration and focus; on a failed focus
        // route again over the candidates after it.
        let mut start = 0;
        loop {
            let remaining = &windows[start..];
            match route(&event, remaining, &origin, self.host.can_open_window()) {
                RouteAction::Dismiss => {
                    log::warn!("⚠️ No window to focus and openWindow unavailable");
                    return ClickOutcome::Dismissed;
                }
                RouteAction::OpenNew { url } => {
                    log::info!("Opening new window: {}", url);
                    return match self.host.open_window(&url).await {
                        Ok(()) => ClickOutcome::Opened { url },
                        Err(e) => {
                            log::error!("❌ {}", e);
                            ClickOutcome::OpenFailed { url }
                        }
                    };
                }
                RouteAction::FocusAndNotify { index, chat_id } => {
                    let window = &remaining[index];
                    log::info!("Focusing existing window");

                    // Only a focused window is told to navigate
                    if let Err(e) = self.host.focus(window).await {
                        log::warn!("⚠️ Window went away before focus: {}", e);
                        start += index + 1;
                        continue;
                    }

                    let mut notified = false;
                    if let Some(chat_id) = chat_id {
                        match self
                            .host
                            .post_message(window, &WindowMessage::OpenChat { chat_id })
                        {
                            Ok(()) => notified = true,
                            Err(e) => log::error!("❌ {}", e),
                        }
                    }

                    return ClickOutcome::Focused {
                        index: start + index,
                        notified,
                    };
                }
            }
        }
    }

    /// `message` from an application window
    pub async fn on_message(&self, data: &Value) -> ControlOutcome {
        log::info!("Received message from app");

        match ControlMessage::parse(data) {
            Some(ControlMessage::SkipWaiting) => match self.host.skip_waiting().await {
                Ok(()) => {
                    log::info!("✅ Skipped waiting, activating");
                    ControlOutcome::Activated
                }
                Err(e) => {
                    log::error!("❌ {}", e);
                    ControlOutcome::ActivationFailed
                }
            },
            None => {
                log::debug!("Ignoring message: {}", data);
                ControlOutcome::Ignored
            }
        }
    }
}
