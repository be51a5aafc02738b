mod broker;
mod factory;
mod notification_publisher;

// Unimplemented modules
mod queue_provider;

use queue_provider::MockQueueProvider;

pub use broker::*;
pub use factory::*;
pub use notification_publisher::*;

#[derive(Clone, PartialEq, Eq)]
pub enum ExpectationMode {
    /// No validity checks of any sort, just a dummy
    Ignore,
    /// Only allows expected items and requires all of them
    ExpectOnlyProvided,
}
