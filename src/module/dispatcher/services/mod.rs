//! Data plane of the dispatcher module
//!
//! Two receivers consume the inbound wallet queues: the expiration consumer
//! patches expired wallets through the wallets REST API, the CDC consumer
//! forwards audit events to the change-log broker topic. Both only run while
//! the control plane has this instance's receivers started, and both get
//! exercised once at startup by the warmup job.

mod cdc;
mod expiration;
mod forwarder;
mod warmup;

pub use cdc::*;
pub use expiration::*;
pub use forwarder::*;
pub use warmup::*;
