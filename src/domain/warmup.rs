//! Fixtures used to exercise the delivery paths during instance startup
//!
//! Warmup traffic is keyed by a reserved wallet identifier so the forwarding
//! path can recognise it and suppress failures. The special-casing of that
//! identifier is confined to [`is_warmup_wallet`]; nothing else in the
//! codebase is allowed to compare against the raw constant.

use super::event::{LoggingEvent, QueueEvent, TracingInfo, WalletEvent};
use chrono::Utc;
use uuid::Uuid;

/// Reserved wallet identifier that marks warmup traffic
pub const WARMUP_WALLET_ID: Uuid = Uuid::nil();

const WARMUP_EVENT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Whether the given wallet identifier marks warmup traffic
pub fn is_warmup_wallet(wallet_id: &str) -> bool {
    Uuid::parse_str(wallet_id)
        .map(|id| id.is_nil())
        .unwrap_or(false)
}

/// Serialized expiration-queue envelope carrying a warmup creation event
pub fn warmup_expiration_payload() -> Result<Vec<u8>, serde_json::Error> {
    let envelope = QueueEvent {
        data: WalletEvent::WalletCreated {
            event_id: WARMUP_EVENT_ID.to_owned(),
            creation_date: Utc::now(),
            wallet_id: WARMUP_WALLET_ID.to_string(),
        },
        tracing_info: Some(TracingInfo::default()),
    };

    serde_json::to_vec(&envelope)
}

/// Serialized CDC-queue envelope carrying a warmup audit event
pub fn warmup_cdc_payload() -> Result<Vec<u8>, serde_json::Error> {
    let envelope = QueueEvent {
        data: LoggingEvent::WalletAdded {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            wallet_id: WARMUP_WALLET_ID.to_string(),
        },
        tracing_info: Some(TracingInfo::default()),
    };

    serde_json::to_vec(&envelope)
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn recognise_the_sentinel() {
        assert!(is_warmup_wallet("00000000-0000-0000-0000-000000000000"));
        assert!(!is_warmup_wallet("3f2e8f53-c6c2-4e4e-b6ef-3757f2b7bbeb"));
        assert!(!is_warmup_wallet("not-a-uuid"));
    }

    #[test]
    fn produce_parseable_expiration_warmup() {
        let payload = warmup_expiration_payload().unwrap();
        let envelope: QueueEvent<WalletEvent> = serde_json::from_slice(&payload).unwrap();

        let WalletEvent::WalletCreated { wallet_id, .. } = &envelope.data;
        assert!(is_warmup_wallet(wallet_id));
        assert!(envelope.tracing_info.is_some());
    }

    #[test]
    fn produce_parseable_cdc_warmup() {
        let payload = warmup_cdc_payload().unwrap();
        let envelope: QueueEvent<LoggingEvent> = serde_json::from_slice(&payload).unwrap();

        assert!(is_warmup_wallet(envelope.data.wallet_id()));
    }
}
