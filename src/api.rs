//! The provider calls a run depends on.
//!
//! Each AWS service used by a run is represented by a small trait with one method per call, taking
//! and returning this crate's types. The traits are implemented for the corresponding
//! `aws_sdk_*::Client`, and can be implemented by in-memory fakes to exercise a run without AWS.
//!
//! Listing methods return a single [`Page`]; draining them is left to
//! [`pagination`](crate::pagination).
#![allow(async_fn_in_trait)]

use aws_smithy_types_convert::date_time::DateTimeExt;

use crate::{
    pagination::Page,
    resource::{ResourceKind, TaggableResource},
    session::TemporaryCredentials,
    Tag,
};

/// A provider error, boxed.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Identifies a selection within a backup plan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectionRef {
    /// The ID of the backup plan the selection belongs to.
    pub backup_plan_id: String,

    /// The ID of the selection.
    pub selection_id: String,
}

/// AWS Backup calls.
pub trait BackupApi {
    /// One page of `ListBackupPlans`, as plan IDs.
    async fn backup_plans_page(&self, next_token: Option<String>)
        -> Result<Page<String>, BoxError>;

    /// One page of `ListBackupSelections` for a plan.
    async fn backup_selections_page(
        &self,
        backup_plan_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<SelectionRef>, BoxError>;

    /// The `ListOfTags` conditions of a selection (`GetBackupSelection`), in provider order.
    async fn selection_condition_tags(&self, selection: &SelectionRef)
        -> Result<Vec<Tag>, BoxError>;
}

/// EC2 calls, covering both instances and volumes.
pub trait Ec2Api {
    /// One page of `DescribeInstances`, flattened across reservations.
    async fn instances_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<TaggableResource>, BoxError>;

    /// One page of `DescribeVolumes`.
    async fn volumes_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<TaggableResource>, BoxError>;

    /// Apply `tag` to every resource in `resource_ids` with a single `CreateTags` call.
    async fn create_tags(&self, resource_ids: Vec<String>, tag: &Tag) -> Result<(), BoxError>;
}

/// EFS calls.
pub trait EfsApi {
    /// One page of `DescribeFileSystems`, continued by `marker`.
    async fn file_systems_page(
        &self,
        marker: Option<String>,
    ) -> Result<Page<TaggableResource>, BoxError>;

    /// Apply `tag` to a single file system.
    async fn tag_file_system(&self, file_system_id: &str, tag: &Tag) -> Result<(), BoxError>;
}

/// STS calls.
pub trait StsApi {
    /// The account of the calling identity (`GetCallerIdentity`).
    async fn caller_account_id(&self) -> Result<String, BoxError>;

    /// Temporary credentials for `role_arn` (`AssumeRole`).
    async fn assume_role(
        &self,
        role_arn: &str,
        role_session_name: &str,
    ) -> Result<TemporaryCredentials, BoxError>;
}

impl BackupApi for aws_sdk_backup::Client {
    async fn backup_plans_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<String>, BoxError> {
        let output = self
            .list_backup_plans()
            .set_next_token(next_token)
            .send()
            .await?;
        let plan_ids = output
            .backup_plans_list()
            .iter()
            .filter_map(|plan| plan.backup_plan_id())
            .map(ToString::to_string)
            .collect();
        Ok(Page::new(plan_ids, output.next_token()))
    }

    async fn backup_selections_page(
        &self,
        backup_plan_id: &str,
        next_token: Option<String>,
    ) -> Result<Page<SelectionRef>, BoxError> {
        let output = self
            .list_backup_selections()
            .backup_plan_id(backup_plan_id)
            .set_next_token(next_token)
            .send()
            .await?;
        let selections = output
            .backup_selections_list()
            .iter()
            .filter_map(|selection| {
                Some(SelectionRef {
                    backup_plan_id: selection
                        .backup_plan_id()
                        .unwrap_or(backup_plan_id)
                        .to_string(),
                    selection_id: selection.selection_id()?.to_string(),
                })
            })
            .collect();
        Ok(Page::new(selections, output.next_token()))
    }

    async fn selection_condition_tags(
        &self,
        selection: &SelectionRef,
    ) -> Result<Vec<Tag>, BoxError> {
        let output = self
            .get_backup_selection()
            .backup_plan_id(&selection.backup_plan_id)
            .selection_id(&selection.selection_id)
            .send()
            .await?;
        Ok(output
            .backup_selection()
            .map(|selection| {
                selection
                    .list_of_tags()
                    .iter()
                    .map(Tag::from_backup_condition)
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl Ec2Api for aws_sdk_ec2::Client {
    async fn instances_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<TaggableResource>, BoxError> {
        let output = self
            .describe_instances()
            .set_next_token(next_token)
            .send()
            .await?;
        let instances = output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .filter_map(|instance| {
                Some(TaggableResource::new(
                    ResourceKind::Instance,
                    instance.instance_id()?,
                    instance.tags().iter().filter_map(Tag::from_ec2).collect(),
                ))
            })
            .collect();
        Ok(Page::new(instances, output.next_token()))
    }

    async fn volumes_page(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<TaggableResource>, BoxError> {
        let output = self
            .describe_volumes()
            .set_next_token(next_token)
            .send()
            .await?;
        let volumes = output
            .volumes()
            .iter()
            .filter_map(|volume| {
                Some(TaggableResource::new(
                    ResourceKind::Volume,
                    volume.volume_id()?,
                    volume.tags().iter().filter_map(Tag::from_ec2).collect(),
                ))
            })
            .collect();
        Ok(Page::new(volumes, output.next_token()))
    }

    async fn create_tags(&self, resource_ids: Vec<String>, tag: &Tag) -> Result<(), BoxError> {
        aws_sdk_ec2::Client::create_tags(self)
            .set_resources(Some(resource_ids))
            .tags(tag.to_ec2())
            .send()
            .await?;
        Ok(())
    }
}

impl EfsApi for aws_sdk_efs::Client {
    async fn file_systems_page(
        &self,
        marker: Option<String>,
    ) -> Result<Page<TaggableResource>, BoxError> {
        let output = self.describe_file_systems().set_marker(marker).send().await?;
        let file_systems = output
            .file_systems()
            .iter()
            .map(|file_system| {
                TaggableResource::new(
                    ResourceKind::FileSystem,
                    file_system.file_system_id(),
                    file_system.tags().iter().map(Tag::from_efs).collect(),
                )
            })
            .collect();
        Ok(Page::new(file_systems, output.next_marker()))
    }

    async fn tag_file_system(&self, file_system_id: &str, tag: &Tag) -> Result<(), BoxError> {
        self.tag_resource()
            .resource_id(file_system_id)
            .tags(tag.to_efs()?)
            .send()
            .await?;
        Ok(())
    }
}

impl StsApi for aws_sdk_sts::Client {
    async fn caller_account_id(&self) -> Result<String, BoxError> {
        let identity = self.get_caller_identity().send().await?;
        identity
            .account()
            .map(ToString::to_string)
            .ok_or_else(|| "GetCallerIdentity returned no account".into())
    }

    async fn assume_role(
        &self,
        role_arn: &str,
        role_session_name: &str,
    ) -> Result<TemporaryCredentials, BoxError> {
        let output = aws_sdk_sts::Client::assume_role(self)
            .role_arn(role_arn)
            .role_session_name(role_session_name)
            .send()
            .await?;
        let credentials = output
            .credentials()
            .ok_or("AssumeRole returned no credentials")?;
        Ok(TemporaryCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: credentials.expiration().to_chrono_utc().ok(),
        })
    }
}
