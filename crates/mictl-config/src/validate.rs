//! Validation helpers for environment names and management URLs.

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Check that an environment name is usable as a map key and a CLI argument.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidName`] for empty names or names containing
/// whitespace.
pub fn validate_environment_name(name: &str) -> ConfigResult<()> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Parse the base URL of a runtime.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] when the value does not parse, is not
/// `http`/`https`, or has no host.
pub fn parse_base_url(value: &str) -> ConfigResult<Url> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_reject_empty_and_whitespace() {
        assert!(validate_environment_name("dev").is_ok());
        assert!(matches!(
            validate_environment_name(""),
            Err(ConfigError::InvalidName { reason: "must not be empty", .. })
        ));
        assert!(matches!(
            validate_environment_name("my env"),
            Err(ConfigError::InvalidName { .. })
        ));
    }

    #[test]
    fn urls_require_http_scheme_and_host() -> ConfigResult<()> {
        let url = parse_base_url("https://localhost:9164")?;
        assert_eq!(url.port(), Some(9164));
        assert!(parse_base_url("ftp://localhost").is_err());
        assert!(parse_base_url("not a url").is_err());
        Ok(())
    }
}
