//! URChat push worker.
//!
//! Runs inside the browser's service worker: turns push payloads into
//! notifications and routes notification clicks back into the app's windows.
//! The decision logic (`notification::normalize`, `router::route`) is pure and
//! host-independent; `Worker` drives it against a [`host::Host`].

pub mod config;
pub mod error;
pub mod host;
pub mod notification;
pub mod protocol;
pub mod router;
pub mod worker;

#[cfg(target_arch = "wasm32")]
mod background;

#[cfg(target_arch = "wasm32")]
pub use background::PushWorker;

pub use config::WorkerConfig;
pub use error::{HostError, HostResult};
pub use notification::{normalize, DeliveryPath, InboundPayload, NotificationDescriptor};
pub use router::{route, ClickEvent, RouteAction};
pub use worker::{ClickOutcome, ControlOutcome, DisplayOutcome, Worker};
