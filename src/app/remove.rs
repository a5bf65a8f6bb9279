use std::io::Write;

use crate::Result;
use crate::cli::RemoveArgs;
use crate::core::AppRunner;
use crate::receptor::ReceptorClient;

use super::common::{incorrect_usage, validate_app_name};

const USAGE: &str = "ltc remove APP_NAME";

pub fn handle_remove<C: ReceptorClient>(
    args: RemoveArgs,
    runner: &AppRunner<C>,
    out: &mut dyn Write,
) -> Result<()> {
    let name = match validate_app_name(args.app_name.as_deref()) {
        Ok(name) => name,
        Err(message) => return incorrect_usage(out, &message, USAGE),
    };

    runner.remove_app(name)?;
    writeln!(out, "Successfully Removed {name}.")?;
    Ok(())
}
