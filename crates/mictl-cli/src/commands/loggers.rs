use std::io::Write;

use mictl_api_models::{LoggerLevelUpdate, MessageResponse, NewLoggerRequest};

use crate::artifact::{ArtifactKind, Target, exactly};
use crate::cli::EnvironmentArgs;
use crate::client::{ApiClient, AppContext, CliError, CliResult};
use crate::commands::{remote_failure, require_environment};
use crate::resolver::resolve;

/// Levels accepted by the runtime's logging subsystem.
pub(crate) const LOG_LEVELS: [&str; 7] = ["OFF", "TRACE", "DEBUG", "INFO", "WARN", "ERROR", "FATAL"];

const ADD_ACTION: &str = "Adding new logger";
const UPDATE_ACTION: &str = "updating logger";

/// Upper-cased level, if it is one the runtime understands.
pub(crate) fn normalize_level(level: &str) -> Option<String> {
    let upper = level.trim().to_ascii_uppercase();
    LOG_LEVELS.contains(&upper.as_str()).then_some(upper)
}

/// `add log-level <logger> <class> <level> -e <env>`.
pub(crate) async fn handle_add_logger(
    ctx: &AppContext,
    args: EnvironmentArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name, class, level] = exactly::<3>(&args.args)?;
    let environment = require_environment(args.environment.as_deref())?;
    let session = ctx.session(environment)?;
    let log_level = checked_level(ADD_ACTION, name, level)?;

    let request = NewLoggerRequest {
        logger_name: name.clone(),
        logging_class: class.clone(),
        log_level,
    };
    let api = ApiClient::new(&ctx.client, &session);
    let path = resolve(ArtifactKind::LogLevels.descriptor(), &Target::Collection)?;
    let response: MessageResponse = api
        .post(&path, &request)
        .await
        .map_err(|err| remote_failure(ADD_ACTION, Some(name.as_str()), err))?;
    writeln!(out, "{}", response.message)?;
    Ok(())
}

/// `update log-level <logger> <level> -e <env>`.
pub(crate) async fn handle_update_logger(
    ctx: &AppContext,
    args: EnvironmentArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name, level] = exactly::<2>(&args.args)?;
    let environment = require_environment(args.environment.as_deref())?;
    let session = ctx.session(environment)?;
    let log_level = checked_level(UPDATE_ACTION, name, level)?;

    let request = LoggerLevelUpdate {
        logger_name: name.clone(),
        log_level,
    };
    let api = ApiClient::new(&ctx.client, &session);
    let path = resolve(ArtifactKind::LogLevels.descriptor(), &Target::Collection)?;
    let response: MessageResponse = api
        .patch(&path, &request)
        .await
        .map_err(|err| remote_failure(UPDATE_ACTION, Some(name.as_str()), err))?;
    writeln!(out, "{}", response.message)?;
    Ok(())
}

fn checked_level(action: &str, name: &str, level: &str) -> CliResult<String> {
    normalize_level(level)
        .ok_or_else(|| CliError::operation(action, Some(name), format!("Invalid log level {level}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use mictl_config::EnvironmentStore;
    use reqwest::Client;
    use serde_json::json;
    use tempfile::TempDir;

    fn context_with(url: &str) -> Result<(TempDir, AppContext)> {
        let dir = tempfile::tempdir()?;
        let store = EnvironmentStore::new(dir.path());
        store.add_environment("testing", url)?;
        store.store_token("testing", "admin", "test-token")?;
        Ok((
            dir,
            AppContext {
                client: Client::new(),
                store,
            },
        ))
    }

    fn env_args(values: &[&str]) -> EnvironmentArgs {
        EnvironmentArgs {
            args: values.iter().map(ToString::to_string).collect(),
            environment: Some("testing".to_string()),
        }
    }

    #[test]
    fn levels_are_case_insensitive() {
        assert_eq!(normalize_level("debug").as_deref(), Some("DEBUG"));
        assert_eq!(normalize_level(" Warn ").as_deref(), Some("WARN"));
        assert_eq!(normalize_level("ABC"), None);
    }

    #[tokio::test]
    async fn add_logger_posts_payload() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/management/logging")
                .json_body(json!({
                    "loggerName": "synapse-api",
                    "loggingClass": "org.apache.synapse.rest.API",
                    "logLevel": "DEBUG"
                }));
            then.status(200)
                .json_body(json!({"message": "Successfully added logger for ('synapse-api')"}));
        });

        let (_dir, ctx) = context_with(&server.base_url())?;
        let mut out: Vec<u8> = Vec::new();
        handle_add_logger(
            &ctx,
            env_args(&["synapse-api", "org.apache.synapse.rest.API", "debug"]),
            &mut out,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert_eq!(
            String::from_utf8(out)?,
            "Successfully added logger for ('synapse-api')\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn invalid_level_is_rejected_before_any_request() -> Result<()> {
        // Nothing listens on this port; reaching the network would change the error.
        let (_dir, ctx) = context_with("http://127.0.0.1:1")?;
        let mut out: Vec<u8> = Vec::new();
        let err = handle_add_logger(
            &ctx,
            env_args(&["synapse-api", "org.apache.synapse.rest.API", "ABC"]),
            &mut out,
        )
        .await
        .expect_err("invalid level");
        assert_eq!(
            err.display_message(),
            "[ERROR]: Adding new logger [ synapse-api ]  Invalid log level ABC"
        );
        assert!(out.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_logger_patches_level() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/management/logging")
                .json_body(json!({"loggerName": "synapse-api", "logLevel": "ERROR"}));
            then.status(200)
                .json_body(json!({"message": "Successfully updated logger.synapse-api.level to ERROR"}));
        });

        let (_dir, ctx) = context_with(&server.base_url())?;
        let mut out: Vec<u8> = Vec::new();
        handle_update_logger(&ctx, env_args(&["synapse-api", "error"]), &mut out)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert!(String::from_utf8(out)?.starts_with("Successfully updated"));
        Ok(())
    }

    #[tokio::test]
    async fn update_logger_requires_two_args() -> Result<()> {
        let (_dir, ctx) = context_with("http://127.0.0.1:1")?;
        let err = handle_update_logger(&ctx, env_args(&["synapse-api"]), &mut Vec::<u8>::new())
            .await
            .expect_err("arity");
        assert_eq!(err.display_message(), "accepts 2 arg(s), received 1");
        Ok(())
    }

    #[tokio::test]
    async fn update_failures_name_the_logger() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PATCH).path("/management/logging");
            then.status(404).json_body(json!({"Error": "Specified logger not found"}));
        });

        let (_dir, ctx) = context_with(&server.base_url())?;
        let err = handle_update_logger(&ctx, env_args(&["missing", "INFO"]), &mut Vec::<u8>::new())
            .await
            .expect_err("404");
        assert_eq!(
            err.display_message(),
            "[ERROR]: updating logger [ missing ]  Specified logger not found"
        );
        Ok(())
    }
}
