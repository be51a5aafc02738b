//! Structures to realise a remotely controllable, event-driven service fleet
//!
//! In an event driven world, instances have no knowledge of each other.
//! Each instance operates independently and reacts to notifications that
//! are published into shared, log-like queues. Every interested party may
//! subscribe to the [`Queue`](QueueDescriptor) of notifications for a
//! specific event and process them.
//!
//! Notifications are consumed in a reliable and resilient way using a concept
//! called [`ConsumerGroups`](ConsumerGroupDescriptor). Instead of using simple
//! publish subscribe between all connected instances, messages are stored in
//! a log-like data structure of limited length where old elements are evicted.
//!
//! When reading from this data structure, each group of consumers tracks its
//! read position independently and begins processing from a defined
//! [`QueueLocation`]. Depending on the [`DeliveryMode`], entries are either
//! acknowledged implicitly when read (commands are idempotent, so losing one
//! to a crash is acceptable) or explicitly once processing concludes.

mod consumer;
mod consumer_group;
mod notification;
mod publisher;
mod queue;
mod queue_provider;

pub use consumer::*;
pub use consumer_group::*;
pub use notification::*;
pub use publisher::*;
pub use queue::*;
pub use queue_provider::*;
