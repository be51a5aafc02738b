use super::{CdcEventService, WalletExpirationService};
use crate::domain::event::{LoggingEvent, QueueEvent, WalletEvent};
use crate::domain::wallet_api::HttpWalletsApi;
use crate::domain::warmup::{warmup_cdc_payload, warmup_expiration_payload};
use crate::harness::RedisCommunicationFactory;
use crate::library::communication::event::Consumer;
use crate::library::communication::CommunicationFactory;
use crate::library::EmptyResult;
use crate::module::dispatcher::options::{CdcOptions, WalletsApiOptions};
use async_trait::async_trait;
use jatsl::{Job, JobManager};
use tracing::{info, warn};

/// Pushes one synthetic event through each consumer at startup
///
/// The payloads travel the same parse-and-handle path as real traffic but
/// are keyed by the warmup sentinel, so downstream failures (a dead broker,
/// an unreachable wallet service) surface as log lines instead of errors.
pub struct WarmupJob {
    redis_url: String,
    cdc: CdcOptions,
    wallets: WalletsApiOptions,
}

impl WarmupJob {
    /// Creates a new warmup job mirroring the consumer configuration
    pub fn new(redis_url: String, cdc: CdcOptions, wallets: WalletsApiOptions) -> Self {
        Self {
            redis_url,
            cdc,
            wallets,
        }
    }
}

#[async_trait]
impl Job for WarmupJob {
    const NAME: &'static str = module_path!();

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let factory = RedisCommunicationFactory::new(self.redis_url.clone());

        let cdc_service = CdcEventService::new(factory.broker_publisher(), &self.cdc);
        let expiration_service = WalletExpirationService::new(HttpWalletsApi::new(
            self.wallets.uri.clone(),
            self.wallets.api_key.clone(),
        ));

        manager.ready().await;

        info!("Warming up queue consumers");

        let expiration_envelope: QueueEvent<WalletEvent> =
            serde_json::from_slice(&warmup_expiration_payload()?)?;
        if let Err(e) = expiration_service.consume(expiration_envelope).await {
            warn!("Wallet expiration warmup failed: {}", e);
        }

        let cdc_envelope: QueueEvent<LoggingEvent> =
            serde_json::from_slice(&warmup_cdc_payload()?)?;
        if let Err(e) = cdc_service.consume(cdc_envelope).await {
            warn!("Wallet CDC warmup failed: {}", e);
        }

        info!("Queue consumer warmup completed");

        Ok(())
    }
}
