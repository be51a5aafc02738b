use anyhow::Result;
use options::{Command, LogFormat};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use walletrelay::harness::ModuleRunner;
use walletrelay::module::control::Control;
use walletrelay::module::dispatcher::Dispatcher;

mod options;
mod telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let (command, runner) = init().await?;

    match command {
        Command::Dispatcher(options) => runner.run(Dispatcher::new(options)).await,
        Command::Control(options) => runner.run(Control::new(options)).await,
    };

    telemetry::flush();

    Ok(())
}

async fn init() -> Result<(options::Command, ModuleRunner)> {
    let options = options::MainOptions::from_args();

    telemetry::init_propagator();

    match &options.telemetry_endpoint {
        Some(endpoint) => telemetry::try_init(&options.log, options.log_format, endpoint)?,
        None => {
            let formatter = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&options.log));

            match options.log_format {
                LogFormat::Text => formatter.init(),
                LogFormat::Compact => formatter.compact().init(),
                LogFormat::Json => formatter.json().init(),
            };
        }
    }

    let runner = match options.status_server {
        Some(port) => ModuleRunner::new_with_status_server(port),
        None => ModuleRunner::default(),
    };

    info!("Walletrelay {}", env!("CARGO_PKG_VERSION"));

    Ok((options.command, runner))
}
