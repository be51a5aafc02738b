//! Attribute keys used on processing spans

use opentelemetry::Key;

/// Identifier of the CDC event being forwarded
pub const CDC_EVENT_ID: Key = Key::from_static_str("wallet.cdc.event.id");
/// Concrete type of the CDC event being forwarded
pub const CDC_EVENT_TYPE: Key = Key::from_static_str("wallet.cdc.event.type");

/// Wallet targeted by a status patch
pub const PATCH_WALLET_ID: Key = Key::from_static_str("wallet.patch.wallet.id");
/// What triggered the status patch
pub const PATCH_TRIGGER: Key = Key::from_static_str("wallet.patch.trigger");
/// Outcome of the status patch (`OK` or `FAIL`)
pub const PATCH_OUTCOME: Key = Key::from_static_str("wallet.patch.outcome");
/// HTTP status code of a failed status patch, empty when the failure happened below HTTP
pub const PATCH_FAIL_STATUS_CODE: Key = Key::from_static_str("wallet.patch.outcome.status_code");
