//! Listing every taggable resource in the session's region.

use tracing::debug;

use crate::{
    api::{Ec2Api, EfsApi},
    pagination::collect_all,
    resource::TaggableResource,
    Error,
};

/// List every EC2 instance.
///
/// # Errors
///
/// Any `DescribeInstances` failure is returned.
pub async fn list_compute_instances(api: &impl Ec2Api) -> Result<Vec<TaggableResource>, Error> {
    let instances = collect_all(|next_token| api.instances_page(next_token))
        .await
        .map_err(Error::list("EC2 instances"))?;
    debug!(count = instances.len(), "Listed EC2 instances");
    Ok(instances)
}

/// List every EBS volume.
///
/// # Errors
///
/// Any `DescribeVolumes` failure is returned.
pub async fn list_block_volumes(api: &impl Ec2Api) -> Result<Vec<TaggableResource>, Error> {
    let volumes = collect_all(|next_token| api.volumes_page(next_token))
        .await
        .map_err(Error::list("EBS volumes"))?;
    debug!(count = volumes.len(), "Listed EBS volumes");
    Ok(volumes)
}

/// List every EFS file system.
///
/// # Errors
///
/// Any `DescribeFileSystems` failure is returned.
pub async fn list_file_systems(api: &impl EfsApi) -> Result<Vec<TaggableResource>, Error> {
    let file_systems = collect_all(|marker| api.file_systems_page(marker))
        .await
        .map_err(Error::list("EFS file systems"))?;
    debug!(count = file_systems.len(), "Listed EFS file systems");
    Ok(file_systems)
}
