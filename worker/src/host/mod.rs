// Host capabilities consumed by the worker
// The browser implementation lives in `service_worker`; tests substitute their own

#[cfg(target_arch = "wasm32")]
pub mod service_worker;

#[cfg(target_arch = "wasm32")]
pub use service_worker::ServiceWorkerHost;

use async_trait::async_trait;

use crate::error::HostResult;
use crate::notification::NotificationDescriptor;
use crate::protocol::WindowMessage;

/// A live window client, snapshotted at click time
pub trait WindowTarget {
    fn url(&self) -> String;

    /// Whether this client can be focused (window clients only)
    fn can_focus(&self) -> bool;
}

/// The clicked notification's visual element
pub trait Dismissible {
    fn dismiss(&self);
}

#[async_trait(?Send)]
pub trait Host {
    type Window: WindowTarget;

    /// Origin of the worker's own scope, e.g. `https://chat.example.com`
    fn origin(&self) -> String;

    /// Milliseconds since the epoch
    fn now_ms(&self) -> f64;

    async fn show_notification(&self, descriptor: &NotificationDescriptor) -> HostResult<()>;

    /// Window clients in host enumeration order, uncontrolled ones included
    async fn match_windows(&self) -> HostResult<Vec<Self::Window>>;

    async fn focus(&self, window: &Self::Window) -> HostResult<()>;

    fn post_message(&self, window: &Self::Window, message: &WindowMessage) -> HostResult<()>;

    fn can_open_window(&self) -> bool;

    async fn open_window(&self, url: &str) -> HostResult<()>;

    async fn skip_waiting(&self) -> HostResult<()>;
}
