//! Configuration surface of the dispatcher module

use crate::domain::DeploymentVersion;
use crate::library::communication::event::{ConsumerGroupDescriptor, QueueLocation};
use crate::module::options::RedisOptions;
use structopt::StructOpt;

/// Options for the dispatcher module
#[derive(Debug, StructOpt)]
pub struct Options {
    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub redis: RedisOptions,

    /// Deployment cohort this instance belongs to.
    /// Control commands may target a single cohort; an instance only acts on
    /// commands addressed to its own cohort (or to all of them).
    #[structopt(long, env = "DEPLOYMENT_VERSION")]
    pub deployment_version: DeploymentVersion,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub control: ControlPlaneOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub status: StatusOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub cdc: CdcOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub wallets: WalletsApiOptions,
}

/// Options for the command queue reader
#[derive(Debug, StructOpt)]
pub struct ControlPlaneOptions {
    /// Prefix of the command consumer group name.
    /// Every instance derives its own group from this prefix and its random
    /// instance id, which is what broadcasts each command to the whole fleet.
    #[structopt(long, env, default_value = "event-dispatcher-commands")]
    pub consumer_group_prefix: String,

    /// Prefix of the consumer name within the command consumer group
    #[structopt(long, env, default_value = "event-dispatcher")]
    pub consumer_name_prefix: String,

    /// Abort startup when the command consumer group cannot be created.
    /// By default the instance comes up anyway and logs the failure.
    #[structopt(long, env)]
    pub fail_on_error_creating_consumer_group: bool,
}

impl ControlPlaneOptions {
    /// Consumer group of this instance on the command queue
    pub fn consumer_group(&self, instance_id: &str) -> ConsumerGroupDescriptor {
        let name = format!("{}-{}", self.consumer_group_prefix, instance_id);

        if self.fail_on_error_creating_consumer_group {
            ConsumerGroupDescriptor::new_strict(name, QueueLocation::Head)
        } else {
            ConsumerGroupDescriptor::new(name, QueueLocation::Head)
        }
    }

    /// Consumer name of this instance within its command consumer group
    pub fn consumer_name(&self, instance_id: &str) -> String {
        format!("{}-{}", self.consumer_name_prefix, instance_id)
    }
}

/// Options for receiver status reporting
#[derive(Debug, StructOpt)]
pub struct StatusOptions {
    /// Seconds between two receiver status reports
    #[structopt(long, env, default_value = "10")]
    pub status_report_interval_secs: u64,

    /// Seconds after which an unrefreshed status record expires.
    /// Bounds how long a crashed instance remains visible in status queries.
    #[structopt(long, env, default_value = "60")]
    pub status_ttl_secs: u64,
}

/// Options for the change-data-capture forwarding path
#[derive(Debug, Clone, StructOpt)]
pub struct CdcOptions {
    /// Broker topic receiving forwarded change events
    #[structopt(long = "cdc-topic", env = "CDC_TOPIC", default_value = "payment-wallet-cdc")]
    pub topic: String,

    /// Total number of delivery attempts per event before giving up
    #[structopt(long, env, default_value = "3")]
    pub cdc_retry_max_attempts: u32,

    /// Milliseconds between two delivery attempts of the same event
    #[structopt(long, env, default_value = "1000")]
    pub cdc_retry_interval_ms: u64,
}

/// Options for the wallets REST API
#[derive(Debug, Clone, StructOpt)]
pub struct WalletsApiOptions {
    /// Base URL of the wallet service
    #[structopt(
        long = "wallets-api-uri",
        env = "WALLETS_API_URI",
        default_value = "http://wallet-service/"
    )]
    pub uri: String,

    /// API key sent along with every wallet status patch
    #[structopt(long = "wallets-api-key", env = "WALLETS_API_KEY", hide_env_values = true)]
    pub api_key: String,
}

#[cfg(test)]
mod does {
    use super::*;

    fn options(strict: bool) -> ControlPlaneOptions {
        ControlPlaneOptions {
            consumer_group_prefix: "event-dispatcher-commands".into(),
            consumer_name_prefix: "event-dispatcher".into(),
            fail_on_error_creating_consumer_group: strict,
        }
    }

    #[test]
    fn derive_identity_from_instance_id() {
        let opts = options(false);
        let group = opts.consumer_group("4242");

        assert_eq!(group.name(), "event-dispatcher-commands-4242");
        assert!(!group.strict());
        assert_eq!(opts.consumer_name("4242"), "event-dispatcher-4242");
    }

    #[test]
    fn escalate_group_creation_failures_when_asked_to() {
        assert!(options(true).consumer_group("4242").strict());
    }
}
