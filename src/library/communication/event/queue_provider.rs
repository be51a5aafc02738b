use super::super::super::BoxedError;
use super::{ConsumerGroupDescriptor, DeliveryMode, QueueDescriptor, QueueEntry};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;

/// Provider of a continuous stream of entries from a queue
#[async_trait]
pub trait QueueProvider {
    /// Entry type yielded by the stream
    type Entry: QueueEntry + Send + Sync;

    /// Consumes a queue as a member of the given consumer group
    ///
    /// Each poll cycle blocks for at most `idle_timeout` so the returned
    /// stream can be torn down between cycles without hanging. Transient read
    /// errors must not end the stream; they are logged by the implementation
    /// and show up as an empty cycle.
    async fn consume(
        &self,
        queue: QueueDescriptor,
        group: &ConsumerGroupDescriptor,
        consumer: &str, // &ConsumerIdentifier
        batch_size: usize,
        idle_timeout: Option<Duration>,
        delivery: DeliveryMode,
    ) -> Result<BoxStream<'static, Result<Self::Entry, BoxedError>>, BoxedError>;
}
