// Host implementation over the browser's service worker APIs

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Client, ClientQueryOptions, ClientType, Notification, NotificationOptions,
    ServiceWorkerGlobalScope, WindowClient,
};

use super::{Dismissible, Host, WindowTarget};
use crate::error::{HostError, HostResult};
use crate::notification::NotificationDescriptor;
use crate::protocol::WindowMessage;

/// `self` inside the service worker
pub struct ServiceWorkerHost {
    scope: ServiceWorkerGlobalScope,
}

impl ServiceWorkerHost {
    /// Fails when not running inside a service worker
    pub fn new() -> HostResult<Self> {
        let scope = js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map_err(|_| HostError::Unsupported("ServiceWorkerGlobalScope"))?;
        Ok(Self { scope })
    }
}

/// A client returned by `clients.matchAll`
pub struct ClientWindow {
    client: Client,
}

impl ClientWindow {
    fn as_window_client(&self) -> Option<&WindowClient> {
        self.client.dyn_ref::<WindowClient>()
    }
}

impl WindowTarget for ClientWindow {
    fn url(&self) -> String {
        self.client.url()
    }

    fn can_focus(&self) -> bool {
        self.as_window_client().is_some()
    }
}

impl Dismissible for Notification {
    fn dismiss(&self) {
        self.close();
    }
}

#[async_trait(?Send)]
impl Host for ServiceWorkerHost {
    type Window = ClientWindow;

    fn origin(&self) -> String {
        self.scope.location().origin()
    }

    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    async fn show_notification(&self, descriptor: &NotificationDescriptor) -> HostResult<()> {
        let options: NotificationOptions = js_sys::JSON::parse(&descriptor.options_json())
            .map_err(|e| HostError::ShowNotification(js_detail(e)))?
            .unchecked_into();

        let promise = self
            .scope
            .registration()
            .show_notification_with_options(&descriptor.title, &options)
            .map_err(|e| HostError::ShowNotification(js_detail(e)))?;

        JsFuture::from(promise)
            .await
            .map_err(|e| HostError::ShowNotification(js_detail(e)))?;
        Ok(())
    }

    async fn match_windows(&self) -> HostResult<Vec<ClientWindow>> {
        let query = ClientQueryOptions::new();
        query.set_type(ClientType::Window);
        query.set_include_uncontrolled(true);

        let list = JsFuture::from(self.scope.clients().match_all_with_options(&query))
            .await
            .map_err(|e| HostError::MatchWindows(js_detail(e)))?;

        let windows = js_sys::Array::from(&list)
            .iter()
            .filter_map(|value| value.dyn_into::<Client>().ok())
            .map(|client| ClientWindow { client })
            .collect();
        Ok(windows)
    }

    async fn focus(&self, window: &ClientWindow) -> HostResult<()> {
        let client = window
            .as_window_client()
            .ok_or(HostError::Unsupported("WindowClient.focus"))?;

        let promise = client
            .focus()
            .map_err(|e| HostError::Focus(js_detail(e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| HostError::Focus(js_detail(e)))?;
        Ok(())
    }

    fn post_message(&self, window: &ClientWindow, message: &WindowMessage) -> HostResult<()> {
        let json = serde_json::to_string(message)
            .map_err(|e| HostError::PostMessage(format!("Serialization error: {}", e)))?;
        let value =
            js_sys::JSON::parse(&json).map_err(|e| HostError::PostMessage(js_detail(e)))?;

        window
            .client
            .post_message(&value)
            .map_err(|e| HostError::PostMessage(js_detail(e)))
    }

    fn can_open_window(&self) -> bool {
        // Mirrors the `if (clients.openWindow)` feature check
        js_sys::Reflect::has(&self.scope.clients(), &JsValue::from_str("openWindow"))
            .unwrap_or(false)
    }

    async fn open_window(&self, url: &str) -> HostResult<()> {
        JsFuture::from(self.scope.clients().open_window(url))
            .await
            .map_err(|e| HostError::OpenWindow(js_detail(e)))?;
        Ok(())
    }

    async fn skip_waiting(&self) -> HostResult<()> {
        let promise = self
            .scope
            .skip_waiting()
            .map_err(|e| HostError::SkipWaiting(js_detail(e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| HostError::SkipWaiting(js_detail(e)))?;
        Ok(())
    }
}

/// Best-effort text for a rejected promise or thrown value
pub(crate) fn js_detail(err: JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{:?}", err)
}
