//! Applying the default tag to resources no backup plan covers.

use tracing::{error, info};

use crate::{
    api::{Ec2Api, EfsApi},
    ResourceKind, Tag, TagError,
};

/// Apply `tag` to EC2 instances or EBS volumes with a single `CreateTags` call.
///
/// EC2 tagging doesn't distinguish resource types, so the same call serves both kinds; `kind` is
/// only used for reporting.
///
/// # Errors
///
/// If the call fails the error is logged and returned. Nothing is retried.
pub async fn tag_compute_resources(
    api: &impl Ec2Api,
    kind: ResourceKind,
    resource_ids: Vec<String>,
    tag: &Tag,
) -> Result<(), TagError> {
    match api.create_tags(resource_ids.clone(), tag).await {
        Ok(()) => {
            info!(%kind, count = resource_ids.len(), %tag, "Applied default tag");
            Ok(())
        }
        Err(source) => Err(logged(TagError {
            kind,
            resource_ids,
            source,
        })),
    }
}

/// Apply `tag` to EFS file systems, one call per file system.
///
/// Tagging stops at the first failure; file systems before it keep the tag.
///
/// # Errors
///
/// The first failing call is logged and returned. Nothing is retried.
pub async fn tag_file_systems(
    api: &impl EfsApi,
    file_system_ids: Vec<String>,
    tag: &Tag,
) -> Result<(), TagError> {
    let mut failure = None;
    for file_system_id in &file_system_ids {
        if let Err(source) = api.tag_file_system(file_system_id, tag).await {
            failure = Some(source);
            break;
        }
    }
    if let Some(source) = failure {
        return Err(logged(TagError {
            kind: ResourceKind::FileSystem,
            resource_ids: file_system_ids,
            source,
        }));
    }
    info!(
        kind = %ResourceKind::FileSystem,
        count = file_system_ids.len(),
        %tag,
        "Applied default tag"
    );
    Ok(())
}

fn logged(error: TagError) -> TagError {
    error!(
        kind = %error.kind,
        resource_ids = ?error.resource_ids,
        error = %error.source,
        "Failed to apply default tag"
    );
    error
}
