use super::super::super::BoxedError;
use super::{Notification, QueueDescriptor};
use async_trait::async_trait;

/// Log-assigned identifier of a published queue entry
pub type LogEntryId = String;

/// Structure which allows publishing of serialized data into a queue
#[async_trait]
pub trait RawNotificationPublisher {
    /// Sends an opaque payload to a [`Queue`](QueueDescriptor), evicting
    /// older entries first so the queue never exceeds its retained length.
    ///
    /// Returns the identifier the log assigned to the new entry. The eviction
    /// and the append are sequenced, not atomic; a crash in between leaves an
    /// empty queue which is indistinguishable from "nothing published yet".
    async fn publish_raw(
        &self,
        data: &[u8],
        descriptor: QueueDescriptor,
    ) -> Result<LogEntryId, BoxedError>;
}

/// Publisher for [`Notifications`](Notification)
#[async_trait]
pub trait NotificationPublisher {
    /// Publishes a [`Notification`] to its designated queue and returns the assigned entry id
    async fn publish<N: Notification + Send + Sync>(
        &self,
        notification: &N,
    ) -> Result<LogEntryId, BoxedError>;
}
