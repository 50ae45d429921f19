//! Registration-time validation utilities.

use crate::types::{Error, Result};

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> Result<()> {
    if s.trim().is_empty() {
        return Err(Error::config(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Validate that a count or size is positive.
pub fn validate_positive(n: usize, field: &str) -> Result<()> {
    if n == 0 {
        return Err(Error::config(format!("{} must be positive", field)));
    }
    Ok(())
}

/// Validate a tool name: lowercase ASCII alphanumerics and single underscores,
/// neither leading nor trailing.
pub fn validate_tool_name(name: &str) -> Result<()> {
    validate_non_empty(name, "tool name")?;

    let well_formed = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with('_')
        && !name.ends_with('_')
        && !name.contains("__");

    if !well_formed {
        return Err(Error::config(format!(
            "invalid tool name '{}': use lowercase letters, digits and single underscores",
            name
        )));
    }
    Ok(())
}
