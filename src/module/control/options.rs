use crate::domain::DeploymentVersion;
use crate::module::options::RedisOptions;
use structopt::StructOpt;

/// Options for the control module
#[derive(Debug, StructOpt)]
pub struct Options {
    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub redis: RedisOptions,

    #[allow(missing_docs)]
    #[structopt(subcommand)]
    pub action: ControlAction,
}

/// Operation to perform against the fleet
#[derive(Debug, StructOpt)]
pub enum ControlAction {
    /// Start the receivers of every targeted instance
    Start {
        /// Cohort to target, every instance when omitted
        #[structopt(long, env = "DEPLOYMENT_VERSION")]
        deployment_version: Option<DeploymentVersion>,
    },
    /// Stop the receivers of every targeted instance
    Stop {
        /// Cohort to target, every instance when omitted
        #[structopt(long, env = "DEPLOYMENT_VERSION")]
        deployment_version: Option<DeploymentVersion>,
    },
    /// Render the live receiver status of the fleet
    Status {
        /// Cohort to show, every instance when omitted
        #[structopt(long, env = "DEPLOYMENT_VERSION")]
        deployment_version: Option<DeploymentVersion>,
    },
}
