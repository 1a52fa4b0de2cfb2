use std::io::Write;

use mictl_api_models::{
    ArtifactListing, DataServiceInfo, DataServiceList, Logger, MessageStoreInfo, MessageStoreList,
    TransactionCount, UserList, UserSummary,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::artifact::{ArtifactDescriptor, ArtifactKind, Target};
use crate::cli::GetArgs;
use crate::client::{ApiClient, AppContext, CliResult};
use crate::commands::{remote_failure, require_environment};
use crate::output::{render_item, render_list};
use crate::resolver::{ResourcePath, resolve};
use crate::template::TemplateData;

/// `get <artifact> [name] -e <env> [-o format]`.
///
/// Checks run in a fixed order: argument count, environment flag, stored
/// credentials. Nothing is sent to the server until all three pass.
pub(crate) async fn handle_get(
    ctx: &AppContext,
    kind: ArtifactKind,
    args: GetArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let target = kind.descriptor().target(&args.names)?;
    let environment = require_environment(args.environment.as_deref())?;
    let session = ctx.session(environment)?;
    let api = ApiClient::new(&ctx.client, &session);
    fetch_and_render(&api, kind, &target, args.format.as_deref(), out).await
}

pub(crate) async fn fetch_and_render(
    api: &ApiClient<'_>,
    kind: ArtifactKind,
    target: &Target,
    format: Option<&str>,
    out: &mut dyn Write,
) -> CliResult<()> {
    let descriptor = kind.descriptor();
    let path = resolve(descriptor, target)?;
    let request = Request {
        descriptor,
        target,
        path: &path,
        format,
    };

    match (kind, target) {
        (ArtifactKind::Users, Target::Collection) => request.list::<UserList>(api, out).await,
        (ArtifactKind::Users, _) => request.item::<UserSummary>(api, out).await,
        (ArtifactKind::LogLevels, _) => request.item::<Logger>(api, out).await,
        (ArtifactKind::DataServices, Target::Collection) => {
            request.list::<DataServiceList>(api, out).await
        }
        (ArtifactKind::DataServices, _) => request.item::<DataServiceInfo>(api, out).await,
        (ArtifactKind::MessageStores, Target::Collection) => {
            request.list::<MessageStoreList>(api, out).await
        }
        (ArtifactKind::MessageStores, _) => request.item::<MessageStoreInfo>(api, out).await,
        (ArtifactKind::TransactionCounts, _) => request.item::<TransactionCount>(api, out).await,
    }
}

struct Request<'a> {
    descriptor: &'static ArtifactDescriptor,
    target: &'a Target,
    path: &'a ResourcePath,
    format: Option<&'a str>,
}

impl Request<'_> {
    async fn list<L>(&self, api: &ApiClient<'_>, out: &mut dyn Write) -> CliResult<()>
    where
        L: ArtifactListing + DeserializeOwned + Serialize,
        L::Item: TemplateData,
    {
        let action = format!("Getting List of {}", self.descriptor.label);
        let list: L = api
            .fetch_list(self.path)
            .await
            .map_err(|err| remote_failure(&action, None, err))?;
        render_list(&list, self.format, self.descriptor, out)
    }

    async fn item<T>(&self, api: &ApiClient<'_>, out: &mut dyn Write) -> CliResult<()>
    where
        T: DeserializeOwned + Serialize + TemplateData,
    {
        let action = format!("Getting Information of {}", self.descriptor.label);
        let name = self.target.display_name();
        let item: T = api
            .fetch_one(self.path)
            .await
            .map_err(|err| remote_failure(&action, name.as_deref(), err))?;
        render_item(&item, self.format, self.descriptor, out)
    }
}
