//! Event relay instance with a remotely controllable data plane
//!
//! The dispatcher consumes the two inbound wallet queues (expiration and
//! change-data-capture) and can be told to start or stop doing so at runtime
//! through the shared command queue. It continuously reports the state of
//! its receivers into the status store where operators can aggregate it
//! across the whole fleet.

use crate::domain::receiver::ReceiverRegistry;
use crate::harness::{Heart, Module, ServiceRunner};
use crate::library::communication::event::{
    ConsumerGroupDescriptor, DeliveryMode, QueueLocation,
};
use crate::library::BoxedError;
use async_trait::async_trait;
use jatsl::{schedule, JobScheduler};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

pub mod control;
pub mod options;
pub mod services;

use control::{CommandDispatcher, CommandListenerJob, StatusReporterJob};
use services::{CdcEventService, WalletExpirationService, WarmupJob};

pub use options::Options;

/// Name under which the expiration receiver reports its status
pub const RECEIVER_WALLET_EXPIRATION: &str = "wallet-expiration";
/// Name under which the change-data-capture receiver reports its status
pub const RECEIVER_WALLET_CDC: &str = "wallet-cdc";

/// Consumer group shared by all instances on the data plane queues
const DATA_PLANE_GROUP: &str = "wallet-relay";

/// Module implementation
pub struct Dispatcher {
    options: Options,
    instance_id: Uuid,
}

impl Dispatcher {
    /// Creates a new instance from raw parts
    ///
    /// The instance id is random per startup; it never survives a restart,
    /// which is what keeps consumer identities on the command queue unique.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            instance_id: Uuid::new_v4(),
        }
    }
}

#[async_trait]
impl Module for Dispatcher {
    async fn run(&mut self, scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        let redis_url = self.options.redis.url.clone();
        let instance_id = self.instance_id.to_string();
        let version = self.options.deployment_version;

        info!(
            instance = %instance_id,
            %version,
            "Starting wallet event dispatcher"
        );

        // Build the receiver switches all data plane consumers hang off of
        let registry = ReceiverRegistry::new();
        let expiration_gate = registry.register(RECEIVER_WALLET_EXPIRATION);
        let cdc_gate = registry.register(RECEIVER_WALLET_CDC);

        // Control plane: command listener + status reporter
        let listener_job = CommandListenerJob::new(
            redis_url.clone(),
            self.options.control.consumer_group(&instance_id),
            self.options.control.consumer_name(&instance_id),
            CommandDispatcher::new(version, registry.clone()),
        );

        let status_job = StatusReporterJob::new(
            redis_url.clone(),
            instance_id.clone(),
            version,
            registry.clone(),
            Duration::from_secs(self.options.status.status_report_interval_secs),
            Duration::from_secs(self.options.status.status_ttl_secs),
        );

        // Data plane: the two gated queue receivers
        let data_group =
            ConsumerGroupDescriptor::new(DATA_PLANE_GROUP.to_owned(), QueueLocation::Tail);

        let expiration_runner = ServiceRunner::<WalletExpirationService<_>>::new(
            redis_url.clone(),
            data_group.clone(),
            instance_id.clone(),
            DeliveryMode::Explicit,
            self.options.wallets.clone(),
        )
        .with_gate(expiration_gate);

        let cdc_runner = ServiceRunner::<CdcEventService<_>>::new(
            redis_url.clone(),
            data_group,
            instance_id.clone(),
            DeliveryMode::Explicit,
            self.options.cdc.clone(),
        )
        .with_gate(cdc_gate);

        let warmup_job = WarmupJob::new(
            redis_url,
            self.options.cdc.clone(),
            self.options.wallets.clone(),
        );

        schedule!(scheduler, {
            listener_job,
            status_job,
            expiration_runner,
            cdc_runner,
            warmup_job
        });

        Ok(Some(Heart::without_heart_stone()))
    }
}
