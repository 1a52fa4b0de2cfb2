//! Command handlers grouped by concern.

pub(crate) mod environments;
pub(crate) mod get;
pub(crate) mod loggers;
pub(crate) mod users;

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::anyhow;
use tracing::debug;

use crate::client::{ApiError, CliError, CliResult};

const ENVIRONMENT_FLAG: &str = "environment";

/// The `-e/--environment` value, or the missing-flag error.
pub(crate) fn require_environment(environment: Option<&str>) -> CliResult<&str> {
    environment
        .map(str::trim)
        .filter(|environment| !environment.is_empty())
        .ok_or_else(|| {
            CliError::validation(format!("required flag(s) \"{ENVIRONMENT_FLAG}\" not set"))
        })
}

/// Wrap an API failure in the `[ERROR]:` line for `action`.
pub(crate) fn remote_failure(action: &str, target: Option<&str>, err: ApiError) -> CliError {
    if let ApiError::Remote { status, .. } = &err {
        debug!(%status, action, "management API rejected request");
    }
    CliError::operation(action, target, err)
}

/// Use the flag value, or prompt without echo when attached to a terminal.
pub(crate) fn resolve_secret(provided: Option<String>, prompt: &str, flag: &str) -> CliResult<String> {
    if let Some(value) = provided {
        if value.is_empty() {
            return Err(CliError::validation(format!("{flag} cannot be empty")));
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        let value = rpassword::prompt_password(prompt).map_err(|err| {
            CliError::failure(anyhow!("failed to read {flag} from stdin: {err}"))
        })?;
        if value.is_empty() {
            return Err(CliError::validation(format!("{flag} cannot be empty")));
        }
        Ok(value)
    } else {
        Err(CliError::validation(format!(
            "{flag} required; supply via --{flag} when running non-interactively"
        )))
    }
}

/// Use the flag value, or read one line from a terminal.
pub(crate) fn resolve_plain(provided: Option<String>, prompt: &str, flag: &str) -> CliResult<String> {
    if let Some(value) = provided {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CliError::validation(format!("{flag} cannot be empty")));
        }
        return Ok(trimmed.to_string());
    }

    if !io::stdin().is_terminal() {
        return Err(CliError::validation(format!(
            "{flag} required; supply via --{flag} when running non-interactively"
        )));
    }
    let mut stderr = io::stderr();
    write!(stderr, "{prompt}")?;
    stderr.flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| CliError::failure(anyhow!("failed to read {flag} from stdin: {err}")))?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{flag} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
