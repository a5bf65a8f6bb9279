use std::io::Write;

use crate::Result;
use crate::cli::ScaleArgs;
use crate::core::AppRunner;
use crate::receptor::ReceptorClient;

use super::common::{incorrect_usage, validate_app_name};

const USAGE: &str = "ltc scale APP_NAME INSTANCES";

pub fn handle_scale<C: ReceptorClient>(
    args: ScaleArgs,
    runner: &AppRunner<C>,
    out: &mut dyn Write,
) -> Result<()> {
    let name = match validate_app_name(args.app_name.as_deref()) {
        Ok(name) => name,
        Err(message) => return incorrect_usage(out, &message, USAGE),
    };
    let instances = match args.instances.as_deref().map(str::trim) {
        None | Some("") => return incorrect_usage(out, "Number of Instances Required", USAGE),
        Some(raw) => match raw.parse::<u32>() {
            Ok(instances) => instances,
            Err(_) => {
                return incorrect_usage(
                    out,
                    &format!("Number of Instances must be a non-negative integer, got `{raw}`"),
                    USAGE,
                );
            }
        },
    };

    runner.scale_app(name, instances)?;
    writeln!(out, "App Scaled Successfully")?;
    Ok(())
}
