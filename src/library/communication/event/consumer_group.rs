use super::QueueLocation;

/// Definition of a consumer group
///
/// In a message queue, a group of consumers collaborates to consume messages.
/// Each message is only delivered to one consumer within the same group. When
/// the group is created, its members start processing messages from the
/// provided [`QueueLocation`].
///
/// Group creation happens lazily when the first consumer attaches. A group
/// that already exists is not an error. Any other bootstrap failure is
/// tolerated by default (the reader continues without a guaranteed group) and
/// only escalates into a hard error when the descriptor is marked as
/// [`strict`](ConsumerGroupDescriptor::strict).
#[derive(Clone)]
pub struct ConsumerGroupDescriptor {
    name: String,
    start: QueueLocation,
    strict: bool,
}

impl ConsumerGroupDescriptor {
    /// Creates a new instance from raw parts
    pub fn new(name: String, start: QueueLocation) -> Self {
        Self {
            name,
            start,
            strict: false,
        }
    }

    /// Same as [`ConsumerGroupDescriptor::new`] but group bootstrap failures become fatal
    pub fn new_strict(name: String, start: QueueLocation) -> Self {
        Self {
            name,
            start,
            strict: true,
        }
    }

    /// Unique name of the group
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location from where a consumer group begins to consume messages
    ///
    /// Note that it is not guaranteed that this will be honored (e.g. when the group already exists)!
    pub fn start(&self) -> &QueueLocation {
        &self.start
    }

    /// Whether a failure to create the group aborts consumption
    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// Unique identifier of a consumer within a [`ConsumerGroup`](ConsumerGroupDescriptor)
pub type ConsumerIdentifier = String;
