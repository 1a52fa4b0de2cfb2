#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, clippy::pedantic)]
//! Shared HTTP DTOs for the management API.
//!
//! These types mirror the JSON documents served under `/management/` and are
//! used by the CLI for request/response encoding. List envelopes expose their
//! items through [`ArtifactListing`] so the rendering pipeline can treat every
//! collection the same way.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Common view over the `{count, list}` envelopes returned by collection endpoints.
pub trait ArtifactListing {
    /// Summary type carried by the envelope.
    type Item;

    /// Count reported by the server.
    fn count(&self) -> u32;

    /// Items in the order the server returned them.
    fn items(&self) -> &[Self::Item];
}

macro_rules! listing {
    ($list:ty, $item:ty, $field:ident) => {
        impl ArtifactListing for $list {
            type Item = $item;

            fn count(&self) -> u32 {
                self.count
            }

            fn items(&self) -> &[Self::Item] {
                &self.$field
            }
        }
    };
}

/// Users registered with the runtime's user store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserList {
    /// Number of users reported by the server.
    #[serde(default)]
    pub count: u32,
    /// User summaries.
    #[serde(
        rename = "list",
        alias = "users",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub users: Vec<UserSummary>,
}

/// A single user, as listed or shown.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    /// User identifier.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Whether the user holds the admin role.
    #[serde(rename = "isAdmin", default, deserialize_with = "lenient_bool")]
    pub is_admin: bool,
    /// Roles assigned to the user; only present on the show endpoint.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<String>,
}

/// Payload for `POST users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUserRequest {
    /// Identifier of the user to create.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Initial password.
    pub password: String,
    /// `"true"` or `"false"`; the API expects a string.
    #[serde(rename = "isAdmin")]
    pub is_admin: String,
}

/// Response body for user creation and deletion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStatusResponse {
    /// Identifier the operation applied to.
    #[serde(rename = "userId", default)]
    pub user_id: String,
    /// Server status label (`Added`, `Deleted`).
    pub status: String,
}

/// A configured logger and its effective level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Logger {
    /// Logger key as configured in the logging properties.
    #[serde(rename = "loggerName")]
    pub logger_name: String,
    /// Fully-qualified component (class or package) the logger targets.
    #[serde(rename = "componentName", default)]
    pub component_name: String,
    /// Effective log level.
    #[serde(rename = "level", alias = "logLevel", default)]
    pub log_level: String,
}

/// Payload for `POST logging`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewLoggerRequest {
    /// Logger key to register.
    #[serde(rename = "loggerName")]
    pub logger_name: String,
    /// Class or package the logger applies to.
    #[serde(rename = "loggingClass")]
    pub logging_class: String,
    /// Initial level.
    #[serde(rename = "logLevel")]
    pub log_level: String,
}

/// Payload for `PATCH logging`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggerLevelUpdate {
    /// Logger key to update.
    #[serde(rename = "loggerName")]
    pub logger_name: String,
    /// New level.
    #[serde(rename = "logLevel")]
    pub log_level: String,
}

/// Generic `{message}` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

/// Data services deployed on the runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataServiceList {
    /// Number of data services reported by the server.
    #[serde(default)]
    pub count: u32,
    /// Data service summaries.
    #[serde(
        rename = "list",
        alias = "dataServices",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub data_services: Vec<DataServiceSummary>,
}

/// Row in the data service listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataServiceSummary {
    /// Service name.
    #[serde(rename = "name", alias = "serviceName")]
    pub service_name: String,
    /// WSDL 1.1 location.
    #[serde(rename = "wsdl1_1", default)]
    pub wsdl11: String,
    /// WSDL 2.0 location.
    #[serde(rename = "wsdl2_0", default)]
    pub wsdl20: String,
}

/// Full description of a deployed data service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataServiceInfo {
    /// Service name.
    #[serde(rename = "serviceName")]
    pub service_name: String,
    /// Service group the service belongs to.
    #[serde(rename = "serviceGroupName", default)]
    pub service_group_name: String,
    /// Free-form description.
    #[serde(rename = "serviceDescription", default)]
    pub service_description: String,
    /// WSDL 1.1 location.
    #[serde(rename = "wsdl1_1", default)]
    pub wsdl11: String,
    /// WSDL 2.0 location.
    #[serde(rename = "wsdl2_0", default)]
    pub wsdl20: String,
    /// Queries exposed by the service.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub queries: Vec<DataServiceQuery>,
}

/// Query definition within a data service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataServiceQuery {
    /// Query identifier.
    pub id: String,
    /// Namespace of the query result.
    #[serde(default)]
    pub namespace: String,
}

/// Message stores deployed on the runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageStoreList {
    /// Number of message stores reported by the server.
    #[serde(default)]
    pub count: u32,
    /// Message store summaries.
    #[serde(
        rename = "list",
        alias = "messageStores",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub message_stores: Vec<MessageStoreSummary>,
}

/// Row in the message store listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageStoreSummary {
    /// Store name.
    pub name: String,
    /// Store implementation type.
    #[serde(rename = "type", default)]
    pub store_type: String,
    /// Number of messages currently held.
    #[serde(default)]
    pub size: i64,
}

/// Full description of a message store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageStoreInfo {
    /// Store name.
    pub name: String,
    /// Configuration file the store was deployed from.
    #[serde(default)]
    pub file: String,
    /// Container (carbon application) the store belongs to.
    #[serde(default)]
    pub container: String,
    /// Store parameters, ordered by name.
    #[serde(default, deserialize_with = "properties_from_map")]
    pub properties: Vec<StoreProperty>,
    /// Number of messages currently held.
    #[serde(default)]
    pub size: i64,
}

/// Single `name = value` store parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreProperty {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

/// Monthly transaction count reported by the runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionCount {
    /// Calendar year.
    #[serde(rename = "Year", alias = "year")]
    pub year: i32,
    /// Calendar month (1-12).
    #[serde(rename = "Month", alias = "month")]
    pub month: i32,
    /// Transactions counted for the period.
    #[serde(rename = "TransactionCount", alias = "transactionCount")]
    pub transaction_count: i64,
}

/// Response body of `POST login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls.
    #[serde(rename = "AccessToken", alias = "accessToken")]
    pub access_token: String,
}

listing!(UserList, UserSummary, users);
listing!(DataServiceList, DataServiceSummary, data_services);
listing!(MessageStoreList, MessageStoreSummary, message_stores);

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<BoolOrText>::deserialize(deserializer)? {
        Some(BoolOrText::Bool(value)) => value,
        Some(BoolOrText::Text(value)) => value.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

fn properties_from_map<'de, D>(deserializer: D) -> Result<Vec<StoreProperty>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, String>>::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| StoreProperty { name, value })
        .collect())
}
