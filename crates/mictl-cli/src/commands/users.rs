use std::io::Write;

use mictl_api_models::{NewUserRequest, UserStatusResponse};

use crate::artifact::{ArtifactKind, Target, exactly};
use crate::cli::{AddUserArgs, EnvironmentArgs};
use crate::client::{ApiClient, AppContext, CliError, CliResult};
use crate::commands::{remote_failure, require_environment, resolve_secret};
use crate::resolver::resolve;

const ADD_ACTION: &str = "Adding new user";
const DELETE_ACTION: &str = "deleting user";

/// `add user <name> -e <env> [--password ..] [--admin]`.
pub(crate) async fn handle_add_user(
    ctx: &AppContext,
    args: AddUserArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name] = exactly::<1>(&args.target.args)?;
    let environment = require_environment(args.target.environment.as_deref())?;
    let session = ctx.session(environment)?;
    let password = new_user_password(args.password, name)?;

    let request = NewUserRequest {
        user_id: name.clone(),
        password,
        is_admin: args.admin.to_string(),
    };
    let api = ApiClient::new(&ctx.client, &session);
    let path = resolve(ArtifactKind::Users.descriptor(), &Target::Collection)?;
    let response: UserStatusResponse = api
        .post(&path, &request)
        .await
        .map_err(|err| remote_failure(ADD_ACTION, Some(name.as_str()), err))?;
    writeln!(out, "{ADD_ACTION} [ {name} ] status: {}", response.status)?;
    Ok(())
}

/// `delete user <name> -e <env>`.
pub(crate) async fn handle_delete_user(
    ctx: &AppContext,
    args: EnvironmentArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name] = exactly::<1>(&args.args)?;
    let environment = require_environment(args.environment.as_deref())?;
    let session = ctx.session(environment)?;

    let api = ApiClient::new(&ctx.client, &session);
    let path = resolve(
        ArtifactKind::Users.descriptor(),
        &Target::Named(name.clone()),
    )?;
    let response: UserStatusResponse = api
        .delete(&path)
        .await
        .map_err(|err| remote_failure(DELETE_ACTION, Some(name.as_str()), err))?;
    writeln!(out, "Deleting user [ {name} ] status: {}", response.status)?;
    Ok(())
}

fn new_user_password(provided: Option<String>, name: &str) -> CliResult<String> {
    if provided.is_some() {
        return resolve_secret(provided, "", "password");
    }
    let password = resolve_secret(None, &format!("Enter password for user [ {name} ]: "), "password")?;
    let confirmation = resolve_secret(None, "Re-enter password: ", "password")?;
    if password == confirmation {
        Ok(password)
    } else {
        Err(CliError::validation("passwords do not match"))
    }
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

    fn context_with(server: &MockServer) -> Result<(TempDir, AppContext)> {
        let dir = tempfile::tempdir()?;
        let store = EnvironmentStore::new(dir.path());
        store.add_environment("testing", &server.base_url())?;
        store.store_token("testing", "admin", "test-token")?;
        Ok((
            dir,
            AppContext {
                client: Client::new(),
                store,
            },
        ))
    }

    fn target(values: &[&str]) -> EnvironmentArgs {
        EnvironmentArgs {
            args: values.iter().map(ToString::to_string).collect(),
            environment: Some("testing".to_string()),
        }
    }

    #[tokio::test]
    async fn add_user_posts_credentials() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/management/users")
                .header("authorization", "Bearer test-token")
                .json_body(json!({"userId": "capp-tester", "password": "pw", "isAdmin": "true"}));
            then.status(200)
                .json_body(json!({"userId": "capp-tester", "status": "Added"}));
        });

        let (_dir, ctx) = context_with(&server)?;
        let mut out: Vec<u8> = Vec::new();
        handle_add_user(
            &ctx,
            AddUserArgs {
                target: target(&["capp-tester"]),
                password: Some("pw".to_string()),
                admin: true,
            },
            &mut out,
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert_eq!(
            String::from_utf8(out)?,
            "Adding new user [ capp-tester ] status: Added\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn add_user_requires_exactly_one_name() -> Result<()> {
        let server = MockServer::start_async().await;
        let (_dir, ctx) = context_with(&server)?;
        let err = handle_add_user(
            &ctx,
            AddUserArgs {
                target: target(&[]),
                password: Some("pw".to_string()),
                admin: false,
            },
            &mut Vec::<u8>::new(),
        )
        .await
        .expect_err("no name");
        assert_eq!(err.display_message(), "accepts 1 arg(s), received 0");
        Ok(())
    }

    #[tokio::test]
    async fn delete_user_reports_status() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/management/users/capp-tester");
            then.status(200)
                .json_body(json!({"userId": "capp-tester", "status": "Deleted"}));
        });

        let (_dir, ctx) = context_with(&server)?;
        let mut out: Vec<u8> = Vec::new();
        handle_delete_user(&ctx, target(&["capp-tester"]), &mut out)
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        assert_eq!(
            String::from_utf8(out)?,
            "Deleting user [ capp-tester ] status: Deleted\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_failure_names_the_user() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/management/users/ghost");
            then.status(404).json_body(json!({"Error": "User ghost does not exist"}));
        });

        let (_dir, ctx) = context_with(&server)?;
        let err = handle_delete_user(&ctx, target(&["ghost"]), &mut Vec::<u8>::new())
            .await
            .expect_err("404");
        assert_eq!(
            err.display_message(),
            "[ERROR]: deleting user [ ghost ]  User ghost does not exist"
        );
        assert_eq!(err.exit_code(), 3);
        Ok(())
    }
}
