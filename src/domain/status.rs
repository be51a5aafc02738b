//! Self-reported receiver status of a running relay instance

use super::DeploymentVersion;
use crate::library::storage::StoredEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const KEYSPACE: &str = "receiver-status";

/// Whether a receiver is currently consuming its inbound queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReceiverState {
    /// The receiver is consuming
    Up,
    /// The receiver has been stopped
    Down,
}

/// State of a single named receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverStatus {
    /// Name of the receiver within its instance
    pub name: String,
    /// Current state
    pub status: ReceiverState,
}

/// Snapshot of every receiver of one instance at one point in time
///
/// Written exclusively by the instance it describes, with a bounded
/// time-to-live, so the record of a crashed instance disappears from
/// aggregate views on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiversStatus {
    /// Identifier of the reporting instance, unique per process startup
    pub consumer_instance_id: String,
    /// Cohort the reporting instance belongs to
    pub version: DeploymentVersion,
    /// Per-receiver states, in registration order
    pub receiver_statuses: Vec<ReceiverStatus>,
    /// When the snapshot was taken
    pub queried_at: DateTime<Utc>,
}

impl StoredEntity for ReceiversStatus {
    fn keyspace() -> &'static str {
        KEYSPACE
    }

    fn key(&self) -> String {
        self.consumer_instance_id.clone()
    }
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn key_by_instance_id() {
        let status = ReceiversStatus {
            consumer_instance_id: "instance-1".into(),
            version: DeploymentVersion::Prod,
            receiver_statuses: Vec::new(),
            queried_at: Utc::now(),
        };

        assert_eq!(status.key(), "instance-1");
        assert_eq!(ReceiversStatus::keyspace(), "receiver-status");
    }

    #[test]
    fn roundtrip_with_camel_case_fields() {
        let status = ReceiversStatus {
            consumer_instance_id: "instance-1".into(),
            version: DeploymentVersion::Staging,
            receiver_statuses: vec![ReceiverStatus {
                name: "wallet-expiration".into(),
                status: ReceiverState::Up,
            }],
            queried_at: Utc::now(),
        };

        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"consumerInstanceId\""));
        assert!(json.contains("\"receiverStatuses\""));
        assert_eq!(serde_json::from_str::<ReceiversStatus>(&json).unwrap(), status);
    }
}
