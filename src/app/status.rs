use std::io::Write;

use crate::Result;
use crate::cli::StatusArgs;
use crate::core::AppRunner;
use crate::receptor::ReceptorClient;

use super::common::{incorrect_usage, validate_app_name};

const USAGE: &str = "ltc status APP_NAME";

/// Report whether `APP_NAME` is desired and whether any instance is running.
pub fn handle_status<C: ReceptorClient>(
    args: StatusArgs,
    runner: &AppRunner<C>,
    out: &mut dyn Write,
) -> Result<()> {
    let name = match validate_app_name(args.app_name.as_deref()) {
        Ok(name) => name,
        Err(message) => return incorrect_usage(out, &message, USAGE),
    };

    if !runner.app_exists(name)? {
        writeln!(out, "{name} is not started.")?;
        return Ok(());
    }

    if runner.is_app_up(name)? {
        writeln!(out, "{name} is running at http://{}", runner.route_for(name))?;
    } else {
        writeln!(out, "{name} is desired but has no running instances yet.")?;
    }
    Ok(())
}
