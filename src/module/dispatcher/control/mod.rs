//! Control plane of the dispatcher module
//!
//! Commands enter through the [`CommandPublisherService`], travel through the
//! shared command queue, and are picked up independently by every instance's
//! [`CommandListenerJob`] which hands them to its local [`CommandDispatcher`].
//! Each instance reports the resulting receiver state through the
//! [`StatusReporterJob`]; the [`StatusAggregator`] assembles those reports on
//! demand.

mod dispatcher;
mod listener;
mod publisher;
mod status;

pub use dispatcher::*;
pub use listener::*;
pub use publisher::*;
pub use status::*;
