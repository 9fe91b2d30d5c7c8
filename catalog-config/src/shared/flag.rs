use crate::shared::ValidationError;

const TRUTHY: &[&str] = &["true", "1", "yes", "on"];
const FALSY: &[&str] = &["false", "0", "no", "off", ""];

/// Parses a boolean-like string such as the one found in `PGSSL`.
///
/// Matching is case-insensitive and ignores surrounding whitespace. An empty value is
/// treated as disabled. `key` is only used to build the error.
pub fn parse_bool_flag(key: &str, value: &str) -> Result<bool, ValidationError> {
    let normalized = value.trim().to_ascii_lowercase();

    if TRUTHY.contains(&normalized.as_str()) {
        return Ok(true);
    }
    if FALSY.contains(&normalized.as_str()) {
        return Ok(false);
    }

    Err(ValidationError::InvalidFlag {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
