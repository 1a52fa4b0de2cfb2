//! Argument parsing and command dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mictl_telemetry::LoggingConfig;
use tracing::{Instrument, info_span};

use crate::artifact::ArtifactKind;
use crate::client::{AppContext, CliDependencies, CliResult};
use crate::commands::environments::{
    handle_add_env, handle_get_envs, handle_login, handle_logout, handle_remove_env,
};
use crate::commands::get::handle_get;
use crate::commands::loggers::{handle_add_logger, handle_update_logger};
use crate::commands::users::{handle_add_user, handle_delete_user};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parses CLI arguments, executes the requested command, and reports
/// failures on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = mictl_telemetry::init_logging(&LoggingConfig::for_cli(cli.verbose)) {
        eprintln!("warning: {err}");
    }

    let deps = match CliDependencies::from_options(cli.timeout, cli.insecure, cli.config_dir.clone())
    {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("{}", err.report());
            return err.exit_code();
        }
    };

    let span = info_span!("command", name = command_label(&cli.command));
    let result = dispatch(cli, &deps, &mut io::stdout())
        .instrument(span)
        .await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", err.report());
            err.exit_code()
        }
    }
}

pub(crate) async fn dispatch(cli: Cli, deps: &CliDependencies, out: &mut dyn Write) -> CliResult<()> {
    let ctx = AppContext::new(deps);

    match cli.command {
        Command::Get(get) => match get {
            GetCommand::Users(args) => handle_get(&ctx, ArtifactKind::Users, args, out).await,
            GetCommand::LogLevels(args) => {
                handle_get(&ctx, ArtifactKind::LogLevels, args, out).await
            }
            GetCommand::DataServices(args) => {
                handle_get(&ctx, ArtifactKind::DataServices, args, out).await
            }
            GetCommand::MessageStores(args) => {
                handle_get(&ctx, ArtifactKind::MessageStores, args, out).await
            }
            GetCommand::TransactionCounts(args) => {
                handle_get(&ctx, ArtifactKind::TransactionCounts, args, out).await
            }
            GetCommand::Envs => handle_get_envs(&ctx, out),
        },
        Command::Add(add) => match add {
            AddCommand::User(args) => handle_add_user(&ctx, args, out).await,
            AddCommand::LogLevel(args) => handle_add_logger(&ctx, args, out).await,
            AddCommand::Env(args) => handle_add_env(&ctx, &args, out),
        },
        Command::Update(UpdateCommand::LogLevel(args)) => {
            handle_update_logger(&ctx, args, out).await
        }
        Command::Delete(DeleteCommand::User(args)) => handle_delete_user(&ctx, args, out).await,
        Command::Remove(RemoveCommand::Env(args)) => handle_remove_env(&ctx, &args, out),
        Command::Login(args) => handle_login(&ctx, args, out).await,
        Command::Logout(args) => handle_logout(&ctx, &args, out).await,
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Get(GetCommand::Users(_)) => "get users",
        Command::Get(GetCommand::LogLevels(_)) => "get log-levels",
        Command::Get(GetCommand::DataServices(_)) => "get data-services",
        Command::Get(GetCommand::MessageStores(_)) => "get message-stores",
        Command::Get(GetCommand::TransactionCounts(_)) => "get transaction-counts",
        Command::Get(GetCommand::Envs) => "get envs",
        Command::Add(AddCommand::User(_)) => "add user",
        Command::Add(AddCommand::LogLevel(_)) => "add log-level",
        Command::Add(AddCommand::Env(_)) => "add env",
        Command::Update(UpdateCommand::LogLevel(_)) => "update log-level",
        Command::Delete(DeleteCommand::User(_)) => "delete user",
        Command::Remove(RemoveCommand::Env(_)) => "remove env",
        Command::Login(_) => "login",
        Command::Logout(_) => "logout",
    }
}

#[derive(Parser)]
#[command(
    name = "mi",
    version,
    about = "Manage Micro Integrator runtimes through the management API"
)]
pub(crate) struct Cli {
    /// Directory holding environments.json
    #[arg(long, global = true, env = "MICTL_HOME")]
    pub(crate) config_dir: Option<PathBuf>,
    /// Skip TLS certificate verification
    #[arg(short = 'k', long, global = true)]
    pub(crate) insecure: bool,
    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "MICTL_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    /// Emit debug logs on stderr
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List or show artifacts deployed on a runtime
    #[command(subcommand)]
    Get(GetCommand),
    /// Create users, loggers or environments
    #[command(subcommand)]
    Add(AddCommand),
    /// Change the level of an existing logger
    #[command(subcommand)]
    Update(UpdateCommand),
    /// Delete a user
    #[command(subcommand)]
    Delete(DeleteCommand),
    /// Forget a registered environment
    #[command(subcommand)]
    Remove(RemoveCommand),
    /// Obtain an access token for an environment
    Login(LoginArgs),
    /// Invalidate and forget the access token of an environment
    Logout(PositionalArgs),
}

#[derive(Subcommand)]
pub(crate) enum GetCommand {
    /// List users, or show the user named by the argument
    Users(GetArgs),
    /// Show the logger named by the argument
    LogLevels(GetArgs),
    /// List data services, or show the data service named by the argument
    DataServices(GetArgs),
    /// List message stores, or show the message store named by the argument
    MessageStores(GetArgs),
    /// Show the transaction count for the current month, or for YEAR MONTH
    TransactionCounts(GetArgs),
    /// List registered environments
    Envs,
}

#[derive(Args)]
pub(crate) struct GetArgs {
    #[arg(value_name = "NAME")]
    pub(crate) names: Vec<String>,
    /// Environment to query
    #[arg(short = 'e', long = "environment")]
    pub(crate) environment: Option<String>,
    /// Output format: `table [template]`, `detail <template>`, `json`, or a template
    #[arg(short = 'o', long = "format")]
    pub(crate) format: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum AddCommand {
    /// Add a user: USER_NAME
    User(AddUserArgs),
    /// Add a logger: LOGGER_NAME CLASS_NAME LOG_LEVEL
    LogLevel(EnvironmentArgs),
    /// Register an environment: NAME URL
    Env(PositionalArgs),
}

#[derive(Subcommand)]
pub(crate) enum UpdateCommand {
    /// Update a logger: LOGGER_NAME LOG_LEVEL
    LogLevel(EnvironmentArgs),
}

#[derive(Subcommand)]
pub(crate) enum DeleteCommand {
    /// Delete a user: USER_NAME
    User(EnvironmentArgs),
}

#[derive(Subcommand)]
pub(crate) enum RemoveCommand {
    /// Remove an environment: NAME
    Env(PositionalArgs),
}

#[derive(Args)]
pub(crate) struct PositionalArgs {
    pub(crate) args: Vec<String>,
}

#[derive(Args)]
pub(crate) struct EnvironmentArgs {
    pub(crate) args: Vec<String>,
    /// Environment to operate on
    #[arg(short = 'e', long = "environment")]
    pub(crate) environment: Option<String>,
}

#[derive(Args)]
pub(crate) struct AddUserArgs {
    #[command(flatten)]
    pub(crate) target: EnvironmentArgs,
    /// Password for the new user; prompted for when omitted
    #[arg(long, env = "MICTL_USER_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    /// Grant the admin role
    #[arg(long)]
    pub(crate) admin: bool,
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    pub(crate) args: Vec<String>,
    /// User name; prompted for when omitted
    #[arg(short, long)]
    pub(crate) username: Option<String>,
    /// Password; prompted for when omitted
    #[arg(short, long, env = "MICTL_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}
