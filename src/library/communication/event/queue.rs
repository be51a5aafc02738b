use super::super::super::BoxedError;
use crate::library::EmptyResult;
use async_trait::async_trait;
use serde::Deserialize;

/// Describes a notification queue and its parameters
#[derive(Debug, PartialEq, Eq)]
pub struct QueueDescriptor {
    key: String,
    limit: usize,
}

impl QueueDescriptor {
    /// Creates a new instance from raw parts
    pub fn new(key: String, limit: usize) -> Self {
        Self { key, limit }
    }

    /// Value which may be used by queue implementations to identify a queue
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Maximum number of notifications to be retained in the queue
    ///
    /// Publishers enforce this bound *before* appending a new entry, so a
    /// queue with a limit of one only ever holds the latest notification.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Location within the queue
#[derive(Clone)]
pub enum QueueLocation {
    /// Start of the queue (not necessarily the first notification as a queue is limited in length)
    Head,
    /// End of the queue (exclusive of the last message)
    Tail,
}

/// How entries handed out by a queue are accounted for
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Entries are considered handled the moment they are read.
    ///
    /// At-most-once per reader; acceptable for idempotent payloads where a
    /// replay would be a no-op anyway.
    AutoAck,
    /// Entries have to be acknowledged through [`RawQueueEntry::acknowledge`]
    Explicit,
}

/// Entry retrieved from a [`Queue`](QueueDescriptor) providing a raw payload
#[async_trait]
pub trait RawQueueEntry {
    /// Log-assigned, monotonically ordered identifier of the entry
    fn id(&self) -> &str;

    /// Payload of the item
    fn payload(&self) -> &[u8];

    /// Acknowledge the item as processed
    ///
    /// No-op when the entry was delivered with [`DeliveryMode::AutoAck`].
    async fn acknowledge(&mut self) -> EmptyResult;
}

/// Useful functions for [`QueueEntry`] implementations with default implementations
pub trait QueueEntry: RawQueueEntry {
    /// Attempts to parse the wire-format payload into a given data structure
    fn parse_payload<'a, T>(&'a self) -> Result<T, BoxedError>
    where
        T: Deserialize<'a>;
}
