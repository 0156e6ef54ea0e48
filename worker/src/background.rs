// Service worker entry points
// All decision logic is in Rust. The JS glue registers one listener per event
// type during the script's initial evaluation (browsers ignore push listeners
// added later) and hands each event to the matching handler below, passing the
// returned promise to `event.waitUntil`.

use std::rc::Rc;

use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{ExtendableMessageEvent, NotificationEvent, PushEvent};

use crate::config::WorkerConfig;
use crate::host::ServiceWorkerHost;
use crate::notification::CarriedData;
use crate::router::ClickEvent;
use crate::worker::Worker;

#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("URChat push worker module loaded");
}

/// Handle to the initialized worker, held by the JS glue.
///
/// Every handler returns a promise that always resolves: failures are logged
/// on the Rust side and never reach the event dispatcher.
#[wasm_bindgen]
pub struct PushWorker {
    inner: Rc<Worker<ServiceWorkerHost>>,
}

#[wasm_bindgen]
impl PushWorker {
    /// Initialize once at worker start.
    ///
    /// `overrides` is an optional object shaped like worker.toml; without it
    /// the embedded config is used.
    #[wasm_bindgen(constructor)]
    pub fn new(overrides: JsValue) -> Result<PushWorker, JsValue> {
        let config =
            load_config(&overrides).map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
        let host = ServiceWorkerHost::new().map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("🚀 URChat push worker initialized ({})", config.app.name);
        Ok(Self {
            inner: Rc::new(Worker::new(config, host)),
        })
    }

    /// Messaging provider's background-message callback
    #[wasm_bindgen(js_name = handleBackgroundMessage)]
    pub fn handle_background_message(&self, payload: JsValue) -> js_sys::Promise {
        let worker = self.inner.clone();
        let payload = js_to_json(&payload);

        future_to_promise(async move {
            worker.on_background_message(&payload).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `push` event
    #[wasm_bindgen(js_name = handlePush)]
    pub fn handle_push(&self, event: PushEvent) -> js_sys::Promise {
        let worker = self.inner.clone();
        let data = event.data().map(|d| d.text());

        future_to_promise(async move {
            worker.on_push(data.as_deref()).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `notificationclick` event
    #[wasm_bindgen(js_name = handleNotificationClick)]
    pub fn handle_notification_click(&self, event: NotificationEvent) -> js_sys::Promise {
        let worker = self.inner.clone();
        let notification = event.notification();
        let click = ClickEvent::new(
            CarriedData::from_value(js_to_json(&notification.data())),
            Some(event.action()),
        );

        future_to_promise(async move {
            worker.on_notification_click(&notification, click).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// `message` event from an application window
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, event: ExtendableMessageEvent) -> js_sys::Promise {
        let worker = self.inner.clone();
        let data = js_to_json(&event.data());

        future_to_promise(async move {
            worker.on_message(&data).await;
            Ok(JsValue::UNDEFINED)
        })
    }
}

fn load_config(overrides: &JsValue) -> anyhow::Result<WorkerConfig> {
    if overrides.is_undefined() || overrides.is_null() {
        return WorkerConfig::embedded();
    }

    let json = js_sys::JSON::stringify(overrides)
        .ok()
        .and_then(|s| s.as_string())
        .ok_or_else(|| anyhow::anyhow!("Config overrides are not JSON-serializable"))?;
    WorkerConfig::from_json(&json)
}

/// Structured-clone value -> JSON. Anything unserializable becomes null.
fn js_to_json(value: &JsValue) -> Value {
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}
