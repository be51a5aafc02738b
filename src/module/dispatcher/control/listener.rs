use super::CommandDispatcher;
use crate::domain::command::DispatcherCommand;
use crate::domain::receiver::ReceiverLifecycle;
use crate::harness::RedisCommunicationFactory;
use crate::library::communication::event::{
    ConsumerGroupDescriptor, DeliveryMode, Notification, QueueEntry, QueueProvider,
};
use crate::library::communication::CommunicationFactory;
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::StreamExt;
use jatsl::{Job, JobManager};
use std::time::Duration;
use tracing::{error, info, warn};

const POLL_TIMEOUT: Duration = Duration::from_secs(5);
const BATCH_SIZE: usize = 10;

/// Message decoded from the command queue
#[derive(Debug, PartialEq)]
pub struct CommandMessage {
    /// Log-assigned identifier of the underlying entry
    pub id: String,
    /// Creation time encoded in the entry id
    pub timestamp: Option<DateTime<Utc>>,
    /// Key of the originating queue
    pub stream_key: String,
    /// The decoded command payload
    pub command: DispatcherCommand,
}

impl CommandMessage {
    fn from_entry<E: QueueEntry>(entry: &E, stream_key: &str) -> Result<Self, BoxedError> {
        let command = entry.parse_payload::<DispatcherCommand>()?;

        Ok(Self {
            id: entry.id().to_owned(),
            timestamp: entry_timestamp(entry.id()),
            stream_key: stream_key.to_owned(),
            command,
        })
    }
}

/// Extracts the millisecond timestamp prefix of a stream entry id
fn entry_timestamp(id: &str) -> Option<DateTime<Utc>> {
    let millis = id.split('-').next()?.parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Polls the command queue of this instance and dispatches every entry
///
/// The job joins the command queue under the instance's own consumer group
/// with auto-acknowledged delivery; a command that was read but never applied
/// because of a crash is gone, which is fine since the operator can simply
/// resend it. Decode and dispatch failures are logged and never terminate the
/// poll loop.
pub struct CommandListenerJob<L: ReceiverLifecycle> {
    redis_url: String,
    group: ConsumerGroupDescriptor,
    consumer: String,
    dispatcher: CommandDispatcher<L>,
}

impl<L> CommandListenerJob<L>
where
    L: ReceiverLifecycle + Send + Sync,
{
    /// Creates a new listener bound to the given consumer identity
    pub fn new(
        redis_url: String,
        group: ConsumerGroupDescriptor,
        consumer: String,
        dispatcher: CommandDispatcher<L>,
    ) -> Self {
        Self {
            redis_url,
            group,
            consumer,
            dispatcher,
        }
    }

    async fn handle_entry<E: QueueEntry>(&self, entry: E, stream_key: &str) {
        match CommandMessage::from_entry(&entry, stream_key) {
            Ok(message) => {
                info!(
                    id = %message.id,
                    stream = %message.stream_key,
                    timestamp = ?message.timestamp,
                    "Received control command: {:?}",
                    message.command
                );

                if let Err(e) = self.dispatcher.dispatch(&message.command).await {
                    error!("Failed to dispatch control command {}: {}", message.id, e);
                }
            }
            Err(e) => warn!("Failed to decode control command entry: {}", e),
        }
    }
}

#[async_trait]
impl<L> Job for CommandListenerJob<L>
where
    L: ReceiverLifecycle + Send + Sync,
{
    const NAME: &'static str = module_path!();

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let factory = RedisCommunicationFactory::new(self.redis_url.clone());
        let provider = factory.queue_provider();

        let queue = DispatcherCommand::queue();
        let stream_key = queue.key().to_owned();

        let stream = provider
            .consume(
                queue,
                &self.group,
                &self.consumer,
                BATCH_SIZE,
                Some(POLL_TIMEOUT),
                DeliveryMode::AutoAck,
            )
            .await?;

        manager.ready().await;

        let stream_key = stream_key.as_str();
        stream
            .for_each(|item| async move {
                match item {
                    Ok(entry) => self.handle_entry(entry, stream_key).await,
                    Err(e) => warn!("Failed to receive control command: {}", e),
                }
            })
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::domain::command::ReceiverCommandKind;
    use crate::library::communication::implementation::json::JsonQueueEntry;
    use crate::library::communication::event::RawQueueEntry;
    use pretty_assertions::assert_eq;

    struct StaticEntry {
        id: String,
        payload: Vec<u8>,
    }

    #[async_trait]
    impl RawQueueEntry for StaticEntry {
        fn id(&self) -> &str {
            &self.id
        }

        fn payload(&self) -> &[u8] {
            &self.payload
        }

        async fn acknowledge(&mut self) -> EmptyResult {
            Ok(())
        }
    }

    impl JsonQueueEntry for StaticEntry {}

    #[test]
    fn decode_entries_into_messages() {
        let entry = StaticEntry {
            id: "1651482600000-0".into(),
            payload: br#"{"type":"ReceiverCommand","receiverCommand":"STOP"}"#.to_vec(),
        };

        let message = CommandMessage::from_entry(&entry, "event-dispatcher.commands").unwrap();

        assert_eq!(message.id, "1651482600000-0");
        assert_eq!(message.stream_key, "event-dispatcher.commands");
        assert_eq!(
            message.timestamp,
            Utc.timestamp_millis_opt(1_651_482_600_000).single()
        );
        assert_eq!(
            message.command,
            DispatcherCommand::ReceiverCommand {
                receiver_command: ReceiverCommandKind::Stop,
                version: None,
            }
        );
    }

    #[test]
    fn reject_malformed_payloads() {
        let entry = StaticEntry {
            id: "1-0".into(),
            payload: b"not-json".to_vec(),
        };

        assert!(CommandMessage::from_entry(&entry, "event-dispatcher.commands").is_err());
    }

    #[test]
    fn tolerate_non_numeric_entry_ids() {
        assert_eq!(entry_timestamp("garbage"), None);
    }
}
