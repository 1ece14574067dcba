//! Input validation for work unit ids and prefixes.
//!
//! Ids have the form `PREFIX-NNN`: a prefix of 2-6 uppercase ASCII letters,
//! a dash, and a zero-padded decimal number. Ids are checked before they are
//! used as map keys or spliced into state columns.

use crate::errors::{Result, WorkflowError};

/// Shortest allowed prefix.
pub const MIN_PREFIX_LENGTH: usize = 2;

/// Longest allowed prefix.
pub const MAX_PREFIX_LENGTH: usize = 6;

/// Validates that a prefix is 2-6 uppercase ASCII letters.
///
/// # Examples
///
/// ```
/// use specflow::validation::validate_prefix;
///
/// assert!(validate_prefix("AUTH").is_ok());
/// assert!(validate_prefix("auth").is_err());
/// assert!(validate_prefix("A").is_err());
/// ```
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let valid_length = (MIN_PREFIX_LENGTH..=MAX_PREFIX_LENGTH).contains(&prefix.len());
    let valid_chars = prefix.chars().all(|c| c.is_ascii_uppercase());

    if valid_length && valid_chars {
        Ok(())
    } else {
        Err(WorkflowError::InvalidPrefix {
            prefix: prefix.to_string(),
        })
    }
}

/// Split an id into its prefix and number, or `None` if it is malformed.
pub fn parse_work_unit_id(id: &str) -> Option<(&str, u32)> {
    let (prefix, number) = id.rsplit_once('-')?;
    validate_prefix(prefix).ok()?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse().ok().map(|n| (prefix, n))
}

/// Validates that an id has the `PREFIX-NNN` form.
pub fn validate_work_unit_id(id: &str) -> Result<()> {
    parse_work_unit_id(id)
        .map(|_| ())
        .ok_or_else(|| WorkflowError::InvalidId { id: id.to_string() })
}

/// Clap value parser for work unit id arguments.
///
/// ```ignore
/// #[arg(value_parser = clap_work_unit_id)]
/// id: String,
/// ```
pub fn clap_work_unit_id(s: &str) -> std::result::Result<String, String> {
    validate_work_unit_id(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

/// Clap value parser for prefix arguments.
pub fn clap_prefix(s: &str) -> std::result::Result<String, String> {
    validate_prefix(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}
