use std::collections::BTreeMap;
use std::io::Write;

use crate::Result;

/// Write a non-fatal usage complaint; the command still exits successfully.
pub fn incorrect_usage(out: &mut dyn Write, message: &str, usage: &str) -> Result<()> {
    writeln!(out, "Incorrect Usage: {message}")?;
    writeln!(out)?;
    writeln!(out, "Usage: {usage}")?;
    Ok(())
}

/// Return the app name if present and made only of ASCII letters, digits, `_` and `-`.
pub fn validate_app_name(name: Option<&str>) -> std::result::Result<&str, String> {
    let name = match name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return Err("App Name required".to_string()),
    };

    if name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    {
        Ok(name)
    } else {
        Err(format!(
            "Invalid App Name `{name}`: use only letters, digits, '-' and '_'"
        ))
    }
}

/// Parse `NAME=VALUE` / `NAME` entries. A bare name takes its value from `lookup`.
pub fn parse_env_entries<F>(
    entries: &[String],
    lookup: F,
) -> std::result::Result<BTreeMap<String, String>, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env = BTreeMap::new();
    for entry in entries {
        let (name, value) = match entry.split_once('=') {
            Some((name, value)) => (name.trim(), value.to_string()),
            None => (entry.trim(), lookup(entry.trim()).unwrap_or_default()),
        };
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(format!("Invalid environment entry `{entry}`"));
        }
        env.insert(name.to_string(), value);
    }
    Ok(env)
}

/// Image references without a scheme are Docker registry images.
pub fn docker_root_fs(image: &str) -> String {
    if image.contains("://") {
        image.to_string()
    } else {
        format!("docker:///{}", image.trim_start_matches('/'))
    }
}
