//! Keyed delivery of opaque payloads to a downstream broker topic

use super::super::EmptyResult;
use async_trait::async_trait;

/// Structure which allows sending keyed messages to a named broker topic
///
/// Unlike [`Notifications`](super::event::Notification), broker messages are
/// not bound to a queue at compile time; the topic is supplied by the caller
/// (usually from configuration). The key determines partitioning downstream
/// and carries no meaning on this side of the fence.
#[async_trait]
pub trait BrokerPublisher {
    /// Sends a single payload to the given topic under the given key
    ///
    /// One invocation equals one delivery attempt; retry policies live with
    /// the caller, not the transport.
    async fn send(&self, topic: &str, key: &str, payload: &[u8]) -> EmptyResult;
}
