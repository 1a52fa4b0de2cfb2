//! Maps an artifact descriptor and a request target to a management API path.

use anyhow::anyhow;
use url::Url;

use crate::artifact::{ArtifactDescriptor, Lookup, Target};
use crate::client::{CliError, CliResult};

/// Resource location relative to the management root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResourcePath {
    resource: &'static str,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
}

impl ResourcePath {
    pub(crate) const fn new(resource: &'static str) -> Self {
        Self {
            resource,
            segments: Vec::new(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    #[must_use]
    pub(crate) fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Absolute URL below `root`, which must end in `/`.
    pub(crate) fn to_url(&self, root: &Url) -> Url {
        let mut url = root.clone();
        // http(s) roots always accept path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(self.resource.split('/'))
                .extend(&self.segments);
        }
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// Path for `target` within the descriptor's collection.
pub(crate) fn resolve(descriptor: &ArtifactDescriptor, target: &Target) -> CliResult<ResourcePath> {
    let path = ResourcePath::new(descriptor.resource);
    match (target, descriptor.lookup) {
        (Target::Collection, _) => Ok(path),
        (Target::Named(name), Lookup::PathSegment) => Ok(path.segment(name.as_str())),
        (Target::Named(name), Lookup::Query(key)) => Ok(path.query(key, name.as_str())),
        (
            Target::Period { year, month },
            Lookup::Period {
                year: year_key,
                month: month_key,
            },
        ) => Ok(path
            .query(year_key, year.as_str())
            .query(month_key, month.as_str())),
        (target, lookup) => Err(CliError::failure(anyhow!(
            "{} cannot address {target:?} via {lookup:?}",
            descriptor.label
        ))),
    }
}
