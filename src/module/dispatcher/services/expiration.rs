use crate::domain::event::{QueueEvent, WalletEvent};
use crate::domain::wallet_api::{HttpWalletsApi, WalletsApi};
use crate::harness::Service;
use crate::library::communication::event::Consumer;
use crate::library::communication::CommunicationFactory;
use crate::library::tracing::{constants, in_span, remote_linked_context};
use crate::library::EmptyResult;
use crate::module::dispatcher::options::WalletsApiOptions;
use async_trait::async_trait;
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::TraceContextExt;
use tracing::{error, info};
use uuid::Uuid;

const SPAN_NAME: &str = "WalletExpirationQueueConsumer";
const PATCH_TRIGGER_EXPIRE: &str = "WALLET_EXPIRE";

/// Consumes the expiration queue and flags expired wallets as errored
///
/// A wallet still sitting in its creation state when the delayed expiration
/// event fires never finished onboarding; its status is patched to `ERROR`
/// with a reason that embeds the original creation timestamp. Patch failures
/// are logged and recorded on the processing span but never crash the
/// consuming pipeline.
pub struct WalletExpirationService<W: WalletsApi> {
    wallets: W,
}

impl<W> WalletExpirationService<W>
where
    W: WalletsApi + Send + Sync,
{
    /// Creates a new instance patching through the given API client
    pub fn new(wallets: W) -> Self {
        Self { wallets }
    }
}

impl<F> Service<F> for WalletExpirationService<HttpWalletsApi>
where
    F: CommunicationFactory + Send + Sync,
{
    const NAME: &'static str = "WalletExpirationService";
    type Instance = WalletExpirationService<HttpWalletsApi>;
    type Config = WalletsApiOptions;

    fn instantiate(_factory: F, config: &Self::Config) -> Self::Instance {
        Self::new(HttpWalletsApi::new(
            config.uri.clone(),
            config.api_key.clone(),
        ))
    }
}

#[async_trait]
impl<W> Consumer for WalletExpirationService<W>
where
    W: WalletsApi + Send + Sync,
{
    type Notification = QueueEvent<WalletEvent>;

    async fn consume(&self, notification: Self::Notification) -> EmptyResult {
        let cx = remote_linked_context(
            SPAN_NAME,
            notification
                .tracing_info
                .as_ref()
                .map(|info| info as &dyn Extractor),
        );

        let WalletEvent::WalletCreated {
            wallet_id,
            creation_date,
            ..
        } = &notification.data;

        info!(
            "Processing wallet expiration event for wallet with id: [{}], created at: [{}]",
            wallet_id, creation_date
        );

        cx.span()
            .set_attribute(constants::PATCH_WALLET_ID.string(wallet_id.clone()));
        cx.span()
            .set_attribute(constants::PATCH_TRIGGER.string(PATCH_TRIGGER_EXPIRE));

        let span_cx = cx.clone();
        in_span(cx, async move {
            let parsed = match Uuid::parse_str(wallet_id) {
                Ok(parsed) => parsed,
                Err(e) => {
                    error!(
                        "Exception processing wallet expiration event, invalid wallet id [{}]: {}",
                        wallet_id, e
                    );
                    return;
                }
            };

            let reason = format!(
                "Wallet expired. Creation date: {}",
                creation_date.to_rfc3339()
            );

            match self.wallets.update_wallet_status_error(parsed, reason).await {
                Ok(()) => {
                    span_cx
                        .span()
                        .set_attribute(constants::PATCH_OUTCOME.string("OK"));
                }
                Err(e) => {
                    span_cx
                        .span()
                        .set_attribute(constants::PATCH_OUTCOME.string("FAIL"));
                    span_cx.span().set_attribute(
                        constants::PATCH_FAIL_STATUS_CODE.string(
                            e.status_code()
                                .map(|code| code.to_string())
                                .unwrap_or_default(),
                        ),
                    );

                    error!("Exception processing wallet expiration event: {}", e);
                }
            }
        })
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::domain::event::TracingInfo;
    use crate::domain::wallet_api::WalletPatchError;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingWalletsApi {
        patches: Mutex<Vec<(Uuid, String)>>,
        fail_with_status: Option<u16>,
    }

    #[async_trait]
    impl WalletsApi for RecordingWalletsApi {
        async fn update_wallet_status_error(
            &self,
            wallet_id: Uuid,
            reason: String,
        ) -> Result<(), WalletPatchError> {
            self.patches.lock().unwrap().push((wallet_id, reason));

            match self.fail_with_status {
                Some(code) => Err(WalletPatchError::ErrorResponse(code)),
                None => Ok(()),
            }
        }
    }

    fn envelope(wallet_id: &str) -> QueueEvent<WalletEvent> {
        QueueEvent {
            data: WalletEvent::WalletCreated {
                event_id: "8c24a1b6-6f5e-4f95-b26a-caa7e95a86be".into(),
                creation_date: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
                wallet_id: wallet_id.into(),
            },
            tracing_info: Some(TracingInfo::default()),
        }
    }

    #[tokio::test]
    async fn patch_expired_wallets_with_the_creation_date() {
        let service = WalletExpirationService::new(RecordingWalletsApi::default());
        let wallet_id = "3f2e8f53-c6c2-4e4e-b6ef-3757f2b7bbeb";

        service.consume(envelope(wallet_id)).await.unwrap();

        let patches = service.wallets.patches.lock().unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].0, Uuid::parse_str(wallet_id).unwrap());
        assert_eq!(
            patches[0].1,
            "Wallet expired. Creation date: 2024-05-02T09:30:00+00:00"
        );
    }

    #[tokio::test]
    async fn swallow_patch_failures() {
        let service = WalletExpirationService::new(RecordingWalletsApi {
            fail_with_status: Some(502),
            ..Default::default()
        });

        let result = service
            .consume(envelope("3f2e8f53-c6c2-4e4e-b6ef-3757f2b7bbeb"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn skip_the_patch_for_unparseable_wallet_ids() {
        let service = WalletExpirationService::new(RecordingWalletsApi::default());

        service.consume(envelope("not-a-uuid")).await.unwrap();

        assert!(service.wallets.patches.lock().unwrap().is_empty());
    }
}
