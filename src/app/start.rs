use std::env;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crate::cli::StartArgs;
use crate::core::{AppRunner, StartAppParams};
use crate::receptor::ReceptorClient;
use crate::{Error, Result};

use super::common::{docker_root_fs, incorrect_usage, parse_env_entries, validate_app_name};

const USAGE: &str =
    "ltc start APP_NAME -i IMAGE [--env NAME[=VALUE]]... -- START_COMMAND [ARGS...]";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long `start` waits for the first running instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub fn handle_start<C: ReceptorClient>(
    args: StartArgs,
    runner: &AppRunner<C>,
    out: &mut dyn Write,
) -> Result<()> {
    let wait = WaitPolicy::new(Duration::from_secs(args.timeout));
    start_with_policy(args, runner, wait, out)
}

pub fn start_with_policy<C: ReceptorClient>(
    args: StartArgs,
    runner: &AppRunner<C>,
    wait: WaitPolicy,
    out: &mut dyn Write,
) -> Result<()> {
    let name = match validate_app_name(args.app_name.as_deref()) {
        Ok(name) => name.to_string(),
        Err(message) => return incorrect_usage(out, &message, USAGE),
    };
    let Some(image) = args.image.as_deref().filter(|image| !image.trim().is_empty()) else {
        return incorrect_usage(out, "Docker Image required", USAGE);
    };
    let Some((start_command, command_args)) = args.command.split_first() else {
        return incorrect_usage(out, "Start Command required", USAGE);
    };
    let env = match parse_env_entries(&args.env, |name| env::var(name).ok()) {
        Ok(env) => env,
        Err(message) => return incorrect_usage(out, &message, USAGE),
    };

    let mut params =
        StartAppParams::new(name.as_str(), docker_root_fs(image.trim()), start_command);
    params.args = command_args.to_vec();
    params.env = env;
    params.privileged = args.run_as_root;
    params.memory_mb = args.memory_mb;
    params.disk_mb = args.disk_mb;
    params.port = args.port;

    runner.start_app(params)?;

    write!(out, "Starting App: {name}")?;
    out.flush()?;
    wait_until_up(runner, &name, wait, out)?;

    writeln!(out)?;
    writeln!(out, "{name} is now running.")?;
    writeln!(out, "http://{}", runner.route_for(&name))?;
    Ok(())
}

fn wait_until_up<C: ReceptorClient>(
    runner: &AppRunner<C>,
    name: &str,
    wait: WaitPolicy,
    out: &mut dyn Write,
) -> Result<()> {
    let started = Instant::now();
    loop {
        if runner.is_app_up(name)? {
            return Ok(());
        }
        if started.elapsed() >= wait.timeout {
            writeln!(out)?;
            return Err(Error::StartTimedOut {
                process_guid: name.to_string(),
                waited_secs: wait.timeout.as_secs(),
            });
        }
        thread::sleep(wait.poll_interval);
        write!(out, ".")?;
        out.flush()?;
    }
}
