//! Alias generation and validation.

use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Random bytes per generated alias; 6 bytes encode to 8 base64 characters.
const ALIAS_BYTES: usize = 6;

pub const MIN_CUSTOM_ALIAS_LEN: usize = 3;
pub const MAX_CUSTOM_ALIAS_LEN: usize = 32;

/// Path segments owned by the router.
pub const RESERVED_ALIASES: &[&str] = &["api", "health", "admin", "static", "favicon.ico"];

/// Generates a random URL-safe alias of 8 characters.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn generate_alias() -> Result<String, AppError> {
    let mut buffer = [0u8; ALIAS_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate alias",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a user-chosen alias.
///
/// Rules: 3-32 characters from `[a-z0-9-]`, no leading or trailing hyphen,
/// not one of [`RESERVED_ALIASES`].
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the violated rule.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < MIN_CUSTOM_ALIAS_LEN || alias.len() > MAX_CUSTOM_ALIAS_LEN {
        return Err(AppError::bad_request(
            format!("Alias must be {MIN_CUSTOM_ALIAS_LEN}-{MAX_CUSTOM_ALIAS_LEN} characters"),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::bad_request(
            "Alias can only contain lowercase letters, digits, and hyphens",
            json!({ "alias": alias }),
        ));
    }

    if alias.starts_with('-') || alias.ends_with('-') {
        return Err(AppError::bad_request(
            "Alias cannot start or end with a hyphen",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES.contains(&alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_alias_shape() {
        let alias = generate_alias().unwrap();
        assert_eq!(alias.len(), 8);
        assert!(
            alias
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_generated_aliases_differ() {
        let aliases: HashSet<String> = (0..500).map(|_| generate_alias().unwrap()).collect();
        assert_eq!(aliases.len(), 500);
    }

    #[test]
    fn test_custom_alias_accepted() {
        assert!(validate_custom_alias("go-2025").is_ok());
        assert!(validate_custom_alias("abc").is_ok());
    }

    #[test]
    fn test_custom_alias_length_bounds() {
        assert!(validate_custom_alias("ab").is_err());
        assert!(validate_custom_alias(&"a".repeat(33)).is_err());
        assert!(validate_custom_alias(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_custom_alias_charset() {
        let err = validate_custom_alias("MyLink").unwrap_err();
        assert!(err.to_string().contains("lowercase"));
        assert!(validate_custom_alias("my_link").is_err());
        assert!(validate_custom_alias("my link").is_err());
    }

    #[test]
    fn test_custom_alias_hyphen_edges() {
        assert!(validate_custom_alias("-link").is_err());
        assert!(validate_custom_alias("link-").is_err());
    }

    #[test]
    fn test_reserved_aliases_rejected() {
        for &reserved in RESERVED_ALIASES {
            assert!(
                validate_custom_alias(reserved).is_err(),
                "'{reserved}' should be rejected"
            );
        }
    }
}
