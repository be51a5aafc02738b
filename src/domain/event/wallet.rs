use super::QueueEvent;
use crate::library::communication::event::{Notification, QueueDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const QUEUE_KEY: &str = "wallet.expiration";
const QUEUE_SIZE: usize = 10_000;

/// Event emitted by the wallet service onto the expiration queue
///
/// The only kind the relay acts upon is the creation event; a wallet that is
/// still in its initial state when the delayed expiration message arrives
/// has never been completed and gets flagged as errored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WalletEvent {
    /// A wallet onboarding was started
    #[serde(rename = "WalletCreatedEvent", rename_all = "camelCase")]
    WalletCreated {
        /// Unique identifier of the event
        event_id: String,
        /// When the wallet was created
        creation_date: DateTime<Utc>,
        /// The wallet the event refers to
        wallet_id: String,
    },
}

impl Notification for QueueEvent<WalletEvent> {
    fn queue() -> QueueDescriptor {
        QueueDescriptor::new(QUEUE_KEY.into(), QUEUE_SIZE)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_created_event_envelope() {
        let json = r#"{
            "data": {
                "type": "WalletCreatedEvent",
                "eventId": "a1e54a46-43ee-4c64-ac9b-07a4f4b3e9c7",
                "creationDate": "2024-05-02T09:30:00Z",
                "walletId": "3f2e8f53-c6c2-4e4e-b6ef-3757f2b7bbeb"
            },
            "tracingInfo": null
        }"#;

        let parsed: QueueEvent<WalletEvent> = serde_json::from_str(json).unwrap();
        let WalletEvent::WalletCreated { wallet_id, .. } = &parsed.data;

        assert_eq!(wallet_id, "3f2e8f53-c6c2-4e4e-b6ef-3757f2b7bbeb");
        assert_eq!(parsed.tracing_info, None);
    }

    #[test]
    fn reject_unknown_event_kinds() {
        let json = r#"{"data":{"type":"WalletFrozenEvent","walletId":"x"}}"#;
        assert!(serde_json::from_str::<QueueEvent<WalletEvent>>(json).is_err());
    }
}
