use std::io::Write;

use log::info;

use crate::Result;
use crate::cli::TargetArgs;
use crate::config::{LatticeConfig, TargetConfig, validate_domain, write_config};

use super::common::incorrect_usage;

const USAGE: &str = "ltc target [DOMAIN]";

/// Print the current target, or persist a new one when a domain is given.
pub fn handle_target(
    args: TargetArgs,
    mut config: LatticeConfig,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(domain) = args.domain.map(|domain| domain.trim().to_string()) else {
        return print_target(&config, out);
    };

    if let Err(message) = validate_domain(&domain) {
        return incorrect_usage(out, &message, USAGE);
    }

    config.target = Some(TargetConfig::from_domain(&domain));
    write_config(&config)?;
    info!("persisted target {domain} to {}", config.file_path.display());

    writeln!(out, "Target set to {domain}")?;
    Ok(())
}

fn print_target(config: &LatticeConfig, out: &mut dyn Write) -> Result<()> {
    match &config.target {
        Some(target) => {
            writeln!(out, "Target:   {}", target.domain)?;
            writeln!(out, "Receptor: {}", target.receptor_url)?;
            writeln!(out, "Logs:     {}", target.log_url)?;
        }
        None => {
            writeln!(out, "No target set. Run `{USAGE}` to choose one.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use tempfile::tempdir;

    fn run(domain: Option<&str>, config: LatticeConfig) -> String {
        let mut out = Vec::new();
        handle_target(
            TargetArgs {
                domain: domain.map(str::to_string),
            },
            config,
            &mut out,
        )
        .expect("target");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn setting_a_target_persists_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".lattice").join("config.toml");

        let output = run(Some("192.168.11.11.xip.io"), LatticeConfig::empty(path.clone()));
        assert_eq!(output, "Target set to 192.168.11.11.xip.io\n");

        let reloaded = load_config(&path).expect("reload");
        assert_eq!(
            reloaded.target,
            Some(TargetConfig::from_domain("192.168.11.11.xip.io"))
        );
    }

    #[test]
    fn reports_current_target() {
        let dir = tempdir().unwrap();
        let mut config = LatticeConfig::empty(dir.path().join("config.toml"));
        assert!(run(None, config.clone()).starts_with("No target set."));

        config.target = Some(TargetConfig::from_domain("lattice.dev"));
        let output = run(None, config);
        assert!(output.contains("Target:   lattice.dev"));
        assert!(output.contains("Receptor: http://receptor.lattice.dev"));
        assert!(output.contains("Logs:     http://doppler.lattice.dev"));
    }

    #[test]
    fn invalid_domain_is_a_usage_error_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let output = run(Some("https://lattice.dev"), LatticeConfig::empty(path.clone()));
        assert!(output.starts_with("Incorrect Usage: "));
        assert!(!path.exists());
    }
}
