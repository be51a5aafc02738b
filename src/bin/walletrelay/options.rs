use std::str::FromStr;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    about = "Relay between wallet notification queues and their downstream consumers.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct MainOptions {
    /// Log level, scopable to different modules
    ///
    /// Levels: trace, debug, info, warn, error
    #[structopt(
        short,
        long,
        global = true,
        default_value = "info,hyper=warn,h2=warn",
        env = "RUST_LOG",
        value_name = "level"
    )]
    pub log: String,

    /// Format log lines are printed in
    #[structopt(
        long,
        global = true,
        default_value = "text",
        env = "LOG_FORMAT",
        value_name = "format"
    )]
    pub log_format: LogFormat,

    /// OpenTelemetry collector endpoint
    ///
    /// Omitting it disables tracing
    #[structopt(long, global = true, env)]
    pub telemetry_endpoint: Option<String>,

    /// Enable status reporting server which can be used as a readiness probe
    #[structopt(long, global = true, env, value_name = "port")]
    pub status_server: Option<u16>,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    Dispatcher(walletrelay::module::dispatcher::Options),
    Control(walletrelay::module::control::Options),
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Text,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}
