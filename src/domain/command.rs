//! Control commands broadcast to every running relay instance

use super::DeploymentVersion;
use crate::library::communication::event::{Notification, QueueDescriptor};
use serde::{Deserialize, Serialize};

const QUEUE_KEY: &str = "event-dispatcher.commands";

/// The command queue only ever retains the latest unconsumed entry; slow
/// readers see the most recent command, never a backlog.
const QUEUE_SIZE: usize = 1;

/// Lifecycle operation requested for the receivers of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReceiverCommandKind {
    /// Resume consumption on all inbound queues
    Start,
    /// Suspend consumption on all inbound queues
    Stop,
}

/// Command addressed to the fleet through the shared command queue
///
/// Commands form a closed set; anything with an unrecognised tag
/// deserializes into [`Unknown`](DispatcherCommand::Unknown) and is rejected
/// loudly by the dispatcher instead of being dropped on the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DispatcherCommand {
    /// Start or stop the receivers of every targeted instance
    #[serde(rename = "ReceiverCommand", rename_all = "camelCase")]
    ReceiverCommand {
        /// Operation to apply to all managed receivers
        receiver_command: ReceiverCommandKind,
        /// Cohort the command is addressed to, `None` targets every instance
        #[serde(default)]
        version: Option<DeploymentVersion>,
    },
    /// Catch-all for command kinds this build does not know how to handle
    #[serde(other)]
    Unknown,
}

impl Notification for DispatcherCommand {
    fn queue() -> QueueDescriptor {
        QueueDescriptor::new(QUEUE_KEY.into(), QUEUE_SIZE)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrip_receiver_command() {
        let command = DispatcherCommand::ReceiverCommand {
            receiver_command: ReceiverCommandKind::Start,
            version: Some(DeploymentVersion::Prod),
        };

        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(
            json,
            r#"{"type":"ReceiverCommand","receiverCommand":"START","version":"PROD"}"#
        );
        assert_eq!(serde_json::from_str::<DispatcherCommand>(&json).unwrap(), command);
    }

    #[test]
    fn default_to_all_versions() {
        let parsed: DispatcherCommand =
            serde_json::from_str(r#"{"type":"ReceiverCommand","receiverCommand":"STOP"}"#).unwrap();

        assert_eq!(
            parsed,
            DispatcherCommand::ReceiverCommand {
                receiver_command: ReceiverCommandKind::Stop,
                version: None,
            }
        );
    }

    #[test]
    fn capture_unknown_command_kinds() {
        let parsed: DispatcherCommand =
            serde_json::from_str(r#"{"type":"RebalanceCommand","shards":3}"#).unwrap();

        assert_eq!(parsed, DispatcherCommand::Unknown);
    }

    #[test]
    fn retain_a_single_entry() {
        assert_eq!(DispatcherCommand::queue().limit(), 1);
    }
}
