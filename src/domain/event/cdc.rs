use super::QueueEvent;
use crate::library::communication::event::{Notification, QueueDescriptor};
use serde::{Deserialize, Serialize};

const QUEUE_KEY: &str = "wallet.cdc";
const QUEUE_SIZE: usize = 10_000;

/// Change-data-capture audit event describing a mutation of a wallet
///
/// Every variant carries the same base data: the event id, the moment the
/// mutation was recorded and the wallet it applies to. The variant itself is
/// the interesting bit for downstream consumers of the change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LoggingEvent {
    /// A wallet was added
    #[serde(rename = "WalletAddedEvent", rename_all = "camelCase")]
    WalletAdded {
        /// Unique identifier of the event
        id: String,
        /// When the mutation was recorded
        timestamp: String,
        /// The wallet the event refers to
        wallet_id: String,
    },
    /// A wallet was migrated from the legacy platform and added
    #[serde(rename = "WalletMigratedAddedEvent", rename_all = "camelCase")]
    WalletMigratedAdded {
        /// Unique identifier of the event
        id: String,
        /// When the mutation was recorded
        timestamp: String,
        /// The wallet the event refers to
        wallet_id: String,
    },
    /// A wallet was deleted
    #[serde(rename = "WalletDeletedEvent", rename_all = "camelCase")]
    WalletDeleted {
        /// Unique identifier of the event
        id: String,
        /// When the mutation was recorded
        timestamp: String,
        /// The wallet the event refers to
        wallet_id: String,
    },
    /// Payment instrument details were attached to a wallet
    #[serde(rename = "WalletDetailsAddedEvent", rename_all = "camelCase")]
    WalletDetailsAdded {
        /// Unique identifier of the event
        id: String,
        /// When the mutation was recorded
        timestamp: String,
        /// The wallet the event refers to
        wallet_id: String,
    },
}

impl LoggingEvent {
    /// Unique identifier of the event
    pub fn id(&self) -> &str {
        match self {
            LoggingEvent::WalletAdded { id, .. }
            | LoggingEvent::WalletMigratedAdded { id, .. }
            | LoggingEvent::WalletDeleted { id, .. }
            | LoggingEvent::WalletDetailsAdded { id, .. } => id,
        }
    }

    /// When the mutation was recorded
    pub fn timestamp(&self) -> &str {
        match self {
            LoggingEvent::WalletAdded { timestamp, .. }
            | LoggingEvent::WalletMigratedAdded { timestamp, .. }
            | LoggingEvent::WalletDeleted { timestamp, .. }
            | LoggingEvent::WalletDetailsAdded { timestamp, .. } => timestamp,
        }
    }

    /// The wallet the event refers to, also the partitioning key downstream
    pub fn wallet_id(&self) -> &str {
        match self {
            LoggingEvent::WalletAdded { wallet_id, .. }
            | LoggingEvent::WalletMigratedAdded { wallet_id, .. }
            | LoggingEvent::WalletDeleted { wallet_id, .. }
            | LoggingEvent::WalletDetailsAdded { wallet_id, .. } => wallet_id,
        }
    }

    /// Name of the concrete event kind, used in logs and span attributes
    pub fn event_type(&self) -> &'static str {
        match self {
            LoggingEvent::WalletAdded { .. } => "WalletAddedEvent",
            LoggingEvent::WalletMigratedAdded { .. } => "WalletMigratedAddedEvent",
            LoggingEvent::WalletDeleted { .. } => "WalletDeletedEvent",
            LoggingEvent::WalletDetailsAdded { .. } => "WalletDetailsAddedEvent",
        }
    }
}

impl Notification for QueueEvent<LoggingEvent> {
    fn queue() -> QueueDescriptor {
        QueueDescriptor::new(QUEUE_KEY.into(), QUEUE_SIZE)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrip_tagged_variants() {
        let event = LoggingEvent::WalletDetailsAdded {
            id: "0b12e3c4-8f3a-45cb-bd23-8d4f4e41f96a".into(),
            timestamp: "2024-05-02T09:30:00Z".into(),
            wallet_id: "3f2e8f53-c6c2-4e4e-b6ef-3757f2b7bbeb".into(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"WalletDetailsAddedEvent\""));
        assert_eq!(serde_json::from_str::<LoggingEvent>(&json).unwrap(), event);
    }

    #[test]
    fn expose_base_fields_across_variants() {
        let event = LoggingEvent::WalletDeleted {
            id: "event-id".into(),
            timestamp: "2024-05-02T09:30:00Z".into(),
            wallet_id: "wallet-id".into(),
        };

        assert_eq!(event.id(), "event-id");
        assert_eq!(event.wallet_id(), "wallet-id");
        assert_eq!(event.event_type(), "WalletDeletedEvent");
    }
}
