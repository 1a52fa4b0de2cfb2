//! Environment registration and session management.

use std::io::Write;

use tracing::{info, warn};

use crate::artifact::exactly;
use crate::cli::{LoginArgs, PositionalArgs};
use crate::client::{ApiClient, AppContext, CliResult, login};
use crate::commands::{remote_failure, resolve_plain, resolve_secret};
use crate::output::align_columns;

const LOGIN_ACTION: &str = "Logging in to MI";

/// `add env <name> <url>`.
pub(crate) fn handle_add_env(
    ctx: &AppContext,
    args: &PositionalArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name, url] = exactly::<2>(&args.args)?;
    ctx.store.add_environment(name, url)?;
    info!(environment = %name, "environment registered");
    writeln!(out, "Successfully added environment '{name}'")?;
    Ok(())
}

/// `remove env <name>`.
pub(crate) fn handle_remove_env(
    ctx: &AppContext,
    args: &PositionalArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name] = exactly::<1>(&args.args)?;
    ctx.store.remove_environment(name)?;
    writeln!(out, "Successfully removed environment '{name}'")?;
    Ok(())
}

/// `get envs`.
pub(crate) fn handle_get_envs(ctx: &AppContext, out: &mut dyn Write) -> CliResult<()> {
    let document = ctx.store.load()?;
    if document.environments.is_empty() {
        writeln!(out, "No Environments found")?;
        return Ok(());
    }

    let mut table = String::from("NAME\tURL\tLOGGED IN\n");
    for (name, entry) in &document.environments {
        let logged_in = match (&entry.token, &entry.username) {
            (Some(_), Some(user)) => user.as_str(),
            (Some(_), None) => "yes",
            (None, _) => "-",
        };
        table.push_str(&format!("{name}\t{}\t{logged_in}\n", entry.url));
    }
    out.write_all(align_columns(&table).as_bytes())?;
    Ok(())
}

/// `login <env> [-u user] [-p password]`.
pub(crate) async fn handle_login(
    ctx: &AppContext,
    args: LoginArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name] = exactly::<1>(&args.args)?;
    let entry = ctx.store.environment(name)?;
    let username = resolve_plain(args.username, "Username: ", "username")?;
    let password = resolve_secret(args.password, "Password: ", "password")?;

    let response = login(&ctx.client, &entry.url, &username, &password)
        .await
        .map_err(|err| remote_failure(LOGIN_ACTION, Some(name.as_str()), err))?;
    ctx.store
        .store_token(name, &username, &response.access_token)?;
    info!(environment = %name, %username, "access token stored");
    writeln!(out, "Login successful for MI in '{name}' environment")?;
    Ok(())
}

/// `logout <env>`. The local token is forgotten even when the server call fails.
pub(crate) async fn handle_logout(
    ctx: &AppContext,
    args: &PositionalArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let [name] = exactly::<1>(&args.args)?;
    let session = ctx.session(name)?;

    let api = ApiClient::new(&ctx.client, &session);
    if let Err(err) = api.logout().await {
        warn!(environment = %name, error = %err, "server-side logout failed");
    }
    ctx.store.clear_token(name)?;
    writeln!(out, "Logged out from MI in '{name}' environment")?;
    Ok(())
}
