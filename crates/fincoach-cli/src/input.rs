use serde_json::Value;
use std::fs;
use std::io::{self, Read};

use fincoach_core::profile::FinancialProfile;

/// Load a profile from a `--profile` path, falling back to piped stdin.
pub fn load_profile(
    path: Option<&str>,
) -> Result<FinancialProfile, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return read_json(path);
    }
    if let Some(value) = read_stdin()? {
        return Ok(serde_json::from_value(value)?);
    }
    Err("--profile <path> is required (or pipe profile JSON via stdin)".into())
}

/// Read a JSON file and deserialize into a typed struct.
fn read_json<T: serde::de::DeserializeOwned>(
    path: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{path}': {e}"))?;
    let value =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse '{path}': {e}"))?;
    Ok(value)
}

/// Read JSON from stdin if data is being piped; None when stdin is a TTY.
fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(trimmed)?))
}
