use crate::domain::command::{DispatcherCommand, ReceiverCommandKind};
use crate::domain::DeploymentVersion;
use crate::library::communication::event::{LogEntryId, NotificationPublisher};
use crate::library::BoxedError;
use thiserror::Error;
use tracing::info;

/// Operator request to start or stop receivers across the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverCommandRequest {
    /// Operation to broadcast
    pub command: ReceiverCommandKind,
    /// Cohort to target, every instance when absent
    pub deployment_version: Option<DeploymentVersion>,
}

/// Errors raised while publishing a control command
#[derive(Debug, Error)]
pub enum CommandPublishError {
    /// The backing command log could not be reached or written
    #[error("command log unavailable")]
    LogUnavailable(#[source] BoxedError),
}

/// Accepts operator commands and appends them to the shared command queue
///
/// The effect is asynchronous fan-out: the returned entry id only confirms
/// that the command reached the log, not that any instance acted on it yet.
pub struct CommandPublisherService<P: NotificationPublisher> {
    publisher: P,
}

impl<P> CommandPublisherService<P>
where
    P: NotificationPublisher + Send + Sync,
{
    /// Creates a new instance publishing through the given publisher
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    /// Stamps the request into a command and appends it to the command queue
    pub async fn handle_command(
        &self,
        request: ReceiverCommandRequest,
    ) -> Result<LogEntryId, CommandPublishError> {
        let command = DispatcherCommand::ReceiverCommand {
            receiver_command: request.command,
            version: request.deployment_version,
        };

        info!("Received event receiver command request: {:?}", command);

        let record_id = self
            .publisher
            .publish(&command)
            .await
            .map_err(CommandPublishError::LogUnavailable)?;

        info!("Sent new command to the queue with id: [{}]", record_id);

        Ok(record_id)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::library::communication::implementation::mock::MockCommunicationFactory;
    use crate::library::communication::CommunicationFactory;

    #[tokio::test]
    async fn publish_the_stamped_command() {
        let factory = MockCommunicationFactory::default();

        factory.expect(&DispatcherCommand::ReceiverCommand {
            receiver_command: ReceiverCommandKind::Start,
            version: Some(DeploymentVersion::Prod),
        });

        let service = CommandPublisherService::new(factory.notification_publisher());
        let id = service
            .handle_command(ReceiverCommandRequest {
                command: ReceiverCommandKind::Start,
                deployment_version: Some(DeploymentVersion::Prod),
            })
            .await
            .unwrap();

        assert_eq!(id, "0-1");
    }

    #[tokio::test]
    async fn surface_log_failures_as_unavailable() {
        let factory = MockCommunicationFactory::ignoring();
        let publisher = factory.notification_publisher();
        publisher.fail_with("connection refused");

        let service = CommandPublisherService::new(publisher);
        let result = service
            .handle_command(ReceiverCommandRequest {
                command: ReceiverCommandKind::Stop,
                deployment_version: None,
            })
            .await;

        assert!(matches!(result, Err(CommandPublishError::LogUnavailable(_))));
    }
}
