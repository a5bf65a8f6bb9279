use std::io::{self, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, error::ErrorKind};
use time::UtcOffset;
use tracing_subscriber::{EnvFilter, fmt};

use lattice::app::{self, LogFormatter, display::stdout_supports_color, error::exit_code};
use lattice::cli::{Cli, Commands};
use lattice::core::{AppRunner, HttpLogReader};
use lattice::receptor::HttpReceptorClient;
use lattice::{
    DEFAULT_LOG_LEVEL, LatticeConfig, LoggingConfig, Result, default_config_path, load_config,
};

/// Filter directive override for diagnostic output on stderr.
const LOG_ENV_VAR: &str = "LATTICE_LOG";

fn main() -> ExitCode {
    // Must run before any thread is spawned for the offset lookup to succeed.
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(64),
            };
        }
    };

    let Cli { config, command } = cli;

    let command = match command {
        Some(cmd) => cmd,
        None => {
            let mut command = Cli::command();
            let _ = command.print_help();
            println!();
            return ExitCode::from(64);
        }
    };

    let config_path = config.unwrap_or_else(default_config_path);
    let exit = load_config(&config_path).and_then(|config| {
        init_logging(&config.logging);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let result = dispatch(command, config, offset, &mut out);
        out.flush()?;
        result
    });

    match exit {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            exit_code(&err)
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn dispatch(
    command: Commands,
    config: LatticeConfig,
    offset: UtcOffset,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Target(args) => app::handle_target(args, config, out),
        Commands::Start(args) => app::handle_start(args, &receptor_runner(&config)?, out),
        Commands::Scale(args) => app::handle_scale(args, &receptor_runner(&config)?, out),
        Commands::Remove(args) => app::handle_remove(args, &receptor_runner(&config)?, out),
        Commands::Status(args) => app::handle_status(args, &receptor_runner(&config)?, out),
        Commands::Logs(args) => {
            let target = config.require_target()?;
            let formatter = LogFormatter::new(offset, stdout_supports_color());
            app::handle_logs(
                args,
                HttpLogReader::new(target.log_url.as_str()),
                &formatter,
                out,
            )
        }
    }
}

fn receptor_runner(config: &LatticeConfig) -> Result<AppRunner<HttpReceptorClient>> {
    let target = config.require_target()?;
    Ok(AppRunner::new(
        HttpReceptorClient::new(target.receptor_url.as_str()),
        target.domain.as_str(),
    ))
}
