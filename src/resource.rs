//! Taggable resources and the reconciliation of their tags against backup plans.
#![allow(clippy::module_name_repetitions)]

use enumset::EnumSetType;
use serde_plain::{forward_display_to_serde, forward_from_str_to_serde};
use tracing::info;

use crate::{MatchTargets, Tag};

/// The kinds of resource that are checked for backup plan tags.
#[derive(Debug, EnumSetType, Hash, serde::Deserialize, serde::Serialize)]
#[enumset(serialize_repr = "list")]
pub enum ResourceKind {
    /// EC2 instances.
    #[serde(rename = "EC2")]
    Instance,

    /// EBS volumes.
    #[serde(rename = "EBS")]
    Volume,

    /// EFS file systems.
    #[serde(rename = "EFS")]
    FileSystem,
}

forward_display_to_serde!(ResourceKind);
forward_from_str_to_serde!(ResourceKind);

/// A resource and the tags it currently carries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggableResource {
    /// The kind of resource.
    pub kind: ResourceKind,

    /// The provider-assigned ID (`InstanceId`, `VolumeId`, or `FileSystemId`).
    pub id: String,

    /// The resource's tags, in the order the provider returned them.
    pub tags: Vec<Tag>,
}

impl TaggableResource {
    /// Construct a resource description.
    pub fn new(kind: ResourceKind, id: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            kind,
            id: id.into(),
            tags,
        }
    }
}

/// The IDs of `resources` that carry none of the match target tags, in input order.
pub fn uncovered_ids(resources: &[TaggableResource], targets: &MatchTargets) -> Vec<String> {
    resources
        .iter()
        .filter(|resource| {
            let covered = targets.covers(&resource.tags);
            info!(kind = %resource.kind, resource_id = %resource.id, covered, "Checked backup tags");
            !covered
        })
        .map(|resource| resource.id.clone())
        .collect()
}
