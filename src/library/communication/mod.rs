//! Structures for communication between relay instances and their shared infrastructure
//!
//! Two modes of operation are provided:
//!
//! 1. Publish and subscribe over size-bounded, log-like queues
//! 2. Keyed fire-and-forget delivery to a downstream broker topic
//!
//! The first mode is used for event notifications which make up the control plane.
//! Whenever something noteworthy happens, a notification describing what happened
//! is published. The notification data structure implements the
//! [`Notification`](event::Notification) trait and thus describes where to expect
//! it in a type-safe manner. Consumption is organised through
//! [`ConsumerGroups`](event::ConsumerGroupDescriptor) which track the read position
//! of each group of readers independently, see the [`event`] module for details.
//!
//! The second mode is used by the data plane to hand events off to an external
//! broker topic where the partitioning key matters but no response is ever
//! expected. It is covered by the [`BrokerPublisher`](broker::BrokerPublisher) trait.

mod communication_factory;

pub mod broker;
pub mod event;
pub mod implementation;

pub use communication_factory::CommunicationFactory;
