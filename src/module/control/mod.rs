//! Operator entry point for steering and inspecting the fleet
//!
//! This module is the command-line stand-in for an API boundary: it accepts
//! a single start/stop/status request, executes it against the shared
//! control plane state and exits. The effect of start/stop is asynchronous
//! fan-out; a successful run only confirms the command reached the log.

use crate::domain::command::ReceiverCommandKind;
use crate::harness::{Heart, Module, RedisCommunicationFactory};
use crate::library::communication::CommunicationFactory;
use crate::library::BoxedError;
use crate::module::dispatcher::control::{
    CommandPublisherService, ReceiverCommandRequest, StatusAggregator,
};
use async_trait::async_trait;
use jatsl::JobScheduler;
use tracing::info;

mod options;

pub use options::{ControlAction, Options};

/// Module implementation
pub struct Control {
    options: Options,
}

impl Control {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Module for Control {
    async fn run(&mut self, _scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        let factory = RedisCommunicationFactory::new(self.options.redis.url.clone());

        match &self.options.action {
            ControlAction::Start { deployment_version } => {
                let service = CommandPublisherService::new(factory.notification_publisher());
                let id = service
                    .handle_command(ReceiverCommandRequest {
                        command: ReceiverCommandKind::Start,
                        deployment_version: *deployment_version,
                    })
                    .await?;

                info!("Start command accepted as log entry [{}]", id);
            }
            ControlAction::Stop { deployment_version } => {
                let service = CommandPublisherService::new(factory.notification_publisher());
                let id = service
                    .handle_command(ReceiverCommandRequest {
                        command: ReceiverCommandKind::Stop,
                        deployment_version: *deployment_version,
                    })
                    .await?;

                info!("Stop command accepted as log entry [{}]", id);
            }
            ControlAction::Status { deployment_version } => {
                let aggregator = StatusAggregator::new(factory.status_store());
                let statuses = aggregator.receivers_status(*deployment_version).await?;

                println!("{}", serde_json::to_string_pretty(&statuses)?);
            }
        }

        Ok(None)
    }
}
