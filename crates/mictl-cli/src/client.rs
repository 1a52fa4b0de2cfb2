//! Shared client utilities, error types, and the management API client.

use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use mictl_api_models::{ArtifactListing, LoginResponse};
use mictl_config::{ConfigError, CredentialSource, EnvironmentStore, Session};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::resolver::ResourcePath;
use crate::template::TemplateError;

/// Path prefix under which the runtime serves its management API.
pub(crate) const MANAGEMENT_PREFIX: &str = "management";

/// CLI-level error type; each variant maps to one exit code and one
/// user-facing rendering.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    MissingCredentials(String),
    Operation {
        action: String,
        target: Option<String>,
        detail: String,
    },
    Template(TemplateError),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Failure of a remote operation, rendered as an `[ERROR]:` line.
    pub(crate) fn operation(
        action: impl Into<String>,
        target: Option<&str>,
        detail: impl Display,
    ) -> Self {
        Self::Operation {
            action: action.into(),
            target: target.map(str::to_string),
            detail: detail.to_string(),
        }
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::MissingCredentials(_) => 2,
            Self::Operation { .. } | Self::Template(_) | Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::MissingCredentials(message) => message.clone(),
            Self::Operation {
                action,
                target: Some(target),
                detail,
            } => format!("[ERROR]: {action} [ {target} ]  {detail}"),
            Self::Operation {
                action,
                target: None,
                detail,
            } => format!("[ERROR]: {action} {detail}"),
            Self::Template(err) => format!("Error executing template: {err}"),
            Self::Failure(error) => format!("{error:#}"),
        }
    }

    /// Line written to stderr when a command fails.
    pub(crate) fn report(&self) -> String {
        match self {
            Self::Validation(_) | Self::Failure(_) => format!("error: {}", self.display_message()),
            _ => self.display_message(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<TemplateError> for CliError {
    fn from(err: TemplateError) -> Self {
        Self::Template(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            err if err.is_missing_credentials() => Self::MissingCredentials(err.to_string()),
            err @ (ConfigError::InvalidName { .. }
            | ConfigError::InvalidUrl { .. }
            | ConfigError::DuplicateEnvironment { .. }
            | ConfigError::HomeDirUnavailable) => Self::Validation(err.to_string()),
            err => Self::Failure(anyhow::Error::new(err)),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::failure(anyhow!("failed to write output: {err}"))
    }
}

/// Failures talking to the management API.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("{0}")]
    Connection(#[source] reqwest::Error),
    #[error("{message}")]
    Remote { status: StatusCode, message: String },
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Dependencies constructed from global CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
    pub(crate) config_dir: PathBuf,
}

impl CliDependencies {
    /// Construct a configured HTTP client and resolve the config directory.
    pub(crate) fn from_options(
        timeout_secs: u64,
        insecure: bool,
        config_dir: Option<PathBuf>,
    ) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if insecure {
            warn!("TLS certificate verification disabled");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        let config_dir = match config_dir {
            Some(dir) => dir,
            None => EnvironmentStore::default_dir()?,
        };
        Ok(Self { client, config_dir })
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) store: EnvironmentStore,
}

impl AppContext {
    pub(crate) fn new(deps: &CliDependencies) -> Self {
        Self {
            client: deps.client.clone(),
            store: EnvironmentStore::new(&deps.config_dir),
        }
    }

    /// Session for `environment`, or the missing-credentials error.
    pub(crate) fn session(&self, environment: &str) -> CliResult<Session> {
        Ok(self.store.session(environment)?)
    }
}

/// Authenticated client bound to one session.
pub(crate) struct ApiClient<'a> {
    http: &'a Client,
    session: &'a Session,
    root: Url,
}

impl<'a> ApiClient<'a> {
    pub(crate) fn new(http: &'a Client, session: &'a Session) -> Self {
        Self {
            http,
            session,
            root: management_root(&session.base_url),
        }
    }

    pub(crate) async fn fetch_list<L>(&self, path: &ResourcePath) -> Result<L, ApiError>
    where
        L: ArtifactListing + DeserializeOwned,
    {
        let list: L = self.send(Method::GET, path, None::<&()>).await?;
        let received = list.items().len();
        if usize::try_from(list.count()).ok() != Some(received) {
            warn!(
                count = list.count(),
                received, "listing count differs from items returned"
            );
        }
        Ok(list)
    }

    pub(crate) async fn fetch_one<T: DeserializeOwned>(
        &self,
        path: &ResourcePath,
    ) -> Result<T, ApiError> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub(crate) async fn post<B, T>(&self, path: &ResourcePath, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn patch<B, T>(&self, path: &ResourcePath, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PATCH, path, Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &ResourcePath,
    ) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, None::<&()>).await
    }

    /// Invalidate the session token on the server; the body is ignored.
    pub(crate) async fn logout(&self) -> Result<(), ApiError> {
        self.send_raw(Method::GET, &ResourcePath::new("logout"), None::<&()>)
            .await
            .map(drop)
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send_raw(method, path, body).await?;
        serde_json::from_slice(&body).map_err(ApiError::Decode)
    }

    async fn send_raw<B>(
        &self,
        method: Method,
        path: &ResourcePath,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = path.to_url(&self.root);
        debug!(
            %method,
            %url,
            environment = %self.session.environment,
            "sending management request"
        );
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.session.token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(ApiError::Connection)?;
        read_body(response).await
    }
}

/// Exchange basic credentials for an access token.
pub(crate) async fn login(
    http: &Client,
    base_url: &Url,
    username: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    let url = ResourcePath::new("login").to_url(&management_root(base_url));
    debug!(%url, username, "requesting access token");
    let response = http
        .post(url)
        .basic_auth(username, Some(password))
        .send()
        .await
        .map_err(ApiError::Connection)?;
    let body = read_body(response).await?;
    serde_json::from_slice(&body).map_err(ApiError::Decode)
}

/// `<base>/management/`, keeping any path prefix the base URL carries.
pub(crate) fn management_root(base_url: &Url) -> Url {
    let mut root = base_url.clone();
    root.set_query(None);
    root.set_fragment(None);
    let path = format!(
        "{}/{MANAGEMENT_PREFIX}/",
        base_url.path().trim_end_matches('/')
    );
    root.set_path(&path);
    root
}

async fn read_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(ApiError::Connection)?;
    debug!(%status, bytes = body.len(), "management response received");
    if status == StatusCode::OK {
        Ok(body.to_vec())
    } else {
        Err(ApiError::Remote {
            status,
            message: remote_message(status, &body),
        })
    }
}

/// Pick the most useful message out of an error response body.
pub(crate) fn remote_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        for key in ["Error", "error", "message", "Message"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        format!("request failed with status {status}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;
    use mictl_api_models::{MessageStoreList, UserList, UserStatusResponse};
    use serde_json::json;

    fn session_for(server: &MockServer) -> Result<Session> {
        Ok(Session::new(
            "testing",
            server.base_url().parse()?,
            "test-token",
        ))
    }

    #[test]
    fn operation_errors_render_bracketed_targets() {
        let err = CliError::operation("Getting Information of logger", Some("abc-logger"), "Not found");
        assert_eq!(
            err.display_message(),
            "[ERROR]: Getting Information of logger [ abc-logger ]  Not found"
        );
        assert_eq!(err.exit_code(), 3);

        let err = CliError::operation("Getting List of users", None, "boom");
        assert_eq!(err.report(), "[ERROR]: Getting List of users boom");
    }

    #[test]
    fn exit_codes_separate_usage_from_runtime_failures() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(
            CliError::from(ConfigError::NotLoggedIn {
                name: "dev".into()
            })
            .exit_code(),
            2
        );
        assert_eq!(
            CliError::from(TemplateError::Unterminated).display_message(),
            "Error executing template: unclosed action"
        );
        assert_eq!(CliError::failure(anyhow::anyhow!("x")).exit_code(), 3);
    }

    #[test]
    fn remote_message_prefers_json_error_fields() {
        assert_eq!(
            remote_message(StatusCode::NOT_FOUND, br#"{"Error":"Specified logger not found"}"#),
            "Specified logger not found"
        );
        assert_eq!(
            remote_message(StatusCode::BAD_REQUEST, b"  plain text  "),
            "plain text"
        );
        assert_eq!(
            remote_message(StatusCode::INTERNAL_SERVER_ERROR, b""),
            "request failed with status 500 Internal Server Error"
        );
    }

    #[test]
    fn management_root_preserves_base_path() -> Result<()> {
        let root = management_root(&"https://localhost:9164".parse()?);
        assert_eq!(root.as_str(), "https://localhost:9164/management/");
        let root = management_root(&"https://gw.example.com/mi/".parse()?);
        assert_eq!(root.as_str(), "https://gw.example.com/mi/management/");
        Ok(())
    }

    #[tokio::test]
    async fn fetch_list_sends_bearer_token() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/management/message-stores")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "count": 1,
                "list": [{"name": "JMSStore", "type": "jms-message-store", "size": 4}]
            }));
        });

        let http = Client::new();
        let session = session_for(&server)?;
        let api = ApiClient::new(&http, &session);
        let list: MessageStoreList = api
            .fetch_list(&ResourcePath::new("message-stores"))
            .await?;
        mock.assert();
        assert_eq!(list.message_stores[0].size, 4);
        Ok(())
    }

    #[tokio::test]
    async fn count_mismatch_still_returns_received_items() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/management/users");
            then.status(200).json_body(json!({
                "count": 3,
                "list": [{"userId": "admin"}]
            }));
        });

        let http = Client::new();
        let session = session_for(&server)?;
        let api = ApiClient::new(&http, &session);
        let list: UserList = api.fetch_list(&ResourcePath::new("users")).await?;
        assert_eq!(list.count(), 3);
        assert_eq!(list.items().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn non_200_status_is_a_remote_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/management/users");
            then.status(201).json_body(json!({"userId": "ops", "status": "Added"}));
        });

        let http = Client::new();
        let session = session_for(&server)?;
        let api = ApiClient::new(&http, &session);
        let result: Result<UserStatusResponse, ApiError> = api
            .post(&ResourcePath::new("users"), &json!({"userId": "ops"}))
            .await;
        assert!(matches!(
            result,
            Err(ApiError::Remote { status, .. }) if status == StatusCode::CREATED
        ));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/management/users");
            then.status(200).body("not json");
        });

        let http = Client::new();
        let session = session_for(&server)?;
        let api = ApiClient::new(&http, &session);
        let result: Result<UserList, ApiError> =
            api.fetch_list(&ResourcePath::new("users")).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connection_error() -> Result<()> {
        let http = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;
        let session = Session::new("testing", "http://127.0.0.1:1".parse()?, "t");
        let api = ApiClient::new(&http, &session);
        let result: Result<UserList, ApiError> =
            api.fetch_list(&ResourcePath::new("users")).await;
        assert!(matches!(result, Err(ApiError::Connection(_))));
        Ok(())
    }

    #[tokio::test]
    async fn login_uses_basic_auth() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/management/login")
                .header("authorization", "Basic YWRtaW46YWRtaW4=");
            then.status(200).json_body(json!({"AccessToken": "issued"}));
        });

        let response = login(&Client::new(), &server.base_url().parse()?, "admin", "admin").await?;
        mock.assert();
        assert_eq!(response.access_token, "issued");
        Ok(())
    }
}
