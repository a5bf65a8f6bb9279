use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const VERSION: &str = env!("LATTICE_VERSION");

/// Top-level CLI definition for the `ltc` tool.
#[derive(Debug, Parser)]
#[command(
    name = "ltc",
    author = "Lattice Project",
    version = VERSION,
    about = "Command-line client for long-running processes on a receptor backend.",
    long_about = "ltc desires, scales and removes apps on a receptor backend \
                  and tails their logs.\n\
                  Point it at an installation first with `ltc target <DOMAIN>`."
)]
pub struct Cli {
    /// Path to an explicit configuration file. Defaults to `~/.lattice/config.toml`.
    #[arg(
        global = true,
        short,
        long = "config",
        value_name = "PATH",
        help = "Load configuration from PATH instead of $LATTICE_CONFIG or ~/.lattice/config.toml"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show or set the backend domain commands are sent to.
    Target(TargetArgs),
    /// Desire a new app and wait for it to come up.
    Start(StartArgs),
    /// Change the number of instances of a running app.
    Scale(ScaleArgs),
    /// Stop and delete an app.
    Remove(RemoveArgs),
    /// Report whether an app is desired and running.
    Status(StatusArgs),
    /// Stream an app's logs until interrupted.
    Logs(LogsArgs),
}

#[derive(Debug, Args, Default)]
pub struct TargetArgs {
    /// System domain of the installation, e.g. `192.168.11.11.xip.io`.
    #[arg(value_name = "DOMAIN")]
    pub domain: Option<String>,
}

#[derive(Debug, Args, Default)]
pub struct StartArgs {
    #[arg(value_name = "APP_NAME")]
    pub app_name: Option<String>,

    /// Image reference; bare names are treated as Docker images.
    #[arg(
        short = 'i',
        long = "docker-image",
        value_name = "IMAGE",
        help = "Root filesystem image, e.g. `library/redis` or `docker:///library/redis`"
    )]
    pub image: Option<String>,

    /// Environment entries passed to the app; repeatable.
    #[arg(
        short,
        long = "env",
        value_name = "NAME[=VALUE]",
        help = "Set NAME to VALUE in the app environment; a bare NAME copies the local value"
    )]
    pub env: Vec<String>,

    #[arg(long, help = "Run the start command with elevated privileges")]
    pub run_as_root: bool,

    #[arg(
        short,
        long = "memory-mb",
        value_name = "MB",
        default_value_t = crate::core::options::DEFAULT_MEMORY_MB,
        help = "Memory limit per instance in megabytes"
    )]
    pub memory_mb: u32,

    #[arg(
        short,
        long = "disk-mb",
        value_name = "MB",
        default_value_t = crate::core::options::DEFAULT_DISK_MB,
        help = "Disk limit per instance in megabytes"
    )]
    pub disk_mb: u32,

    #[arg(
        short,
        long,
        value_name = "PORT",
        default_value_t = crate::core::options::DEFAULT_PORT,
        help = "Port the app listens on; exported to the app as $PORT"
    )]
    pub port: u16,

    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = 30,
        help = "Give up waiting for a running instance after SECONDS"
    )]
    pub timeout: u64,

    /// Start command followed by its arguments, after `--`.
    #[arg(last = true, value_name = "START_COMMAND")]
    pub command: Vec<String>,
}

#[derive(Debug, Args, Default)]
pub struct ScaleArgs {
    #[arg(value_name = "APP_NAME")]
    pub app_name: Option<String>,

    /// Desired instance count; validated by the handler.
    #[arg(value_name = "INSTANCES")]
    pub instances: Option<String>,
}

#[derive(Debug, Args, Default)]
pub struct RemoveArgs {
    #[arg(value_name = "APP_NAME")]
    pub app_name: Option<String>,
}

#[derive(Debug, Args, Default)]
pub struct StatusArgs {
    #[arg(value_name = "APP_NAME")]
    pub app_name: Option<String>,
}

#[derive(Debug, Args, Default)]
pub struct LogsArgs {
    #[arg(value_name = "APP_NAME")]
    pub app_name: Option<String>,
}
