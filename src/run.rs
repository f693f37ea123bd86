//! A complete tagging run for one account and region.

use std::future::Future;

use aws_sdk_ec2::error::DisplayErrorContext;
use chrono::{DateTime, Utc};
use enumset::EnumSet;
use tracing::{info, warn};

use crate::{
    api::{BackupApi, Ec2Api, EfsApi},
    apply, enumerate, inventory,
    resource::{uncovered_ids, TaggableResource},
    session::{self, Session, SessionPlan},
    AccountId, Config, Error, Invocation, MatchTargets, ResourceKind, Tag, TagError,
};

/// The outcome of applying the default tag to one kind of resource.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TaggingOutcome {
    /// Every resource was already covered, so nothing was tagged.
    NotNeeded,

    /// The default tag was applied to every uncovered resource.
    Tagged,

    /// Applying the default tag failed.
    Failed {
        /// The error, with its causes.
        reason: String,
    },
}

/// What happened to one kind of resource during a run.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct KindReport {
    /// The kind of resource.
    pub kind: ResourceKind,

    /// How many resources of this kind exist in the region.
    pub scanned: usize,

    /// The resources that carried no backup plan tag.
    pub uncovered: Vec<String>,

    /// The result of tagging `uncovered`.
    pub outcome: TaggingOutcome,
}

/// The result of reconciling the resources of one region.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct RegionReport {
    /// The tags that mark a resource as covered.
    pub match_targets: MatchTargets,

    /// One entry per resource kind, in processing order.
    pub resources: Vec<KindReport>,

    /// The kinds for which tagging failed.
    pub failed_kinds: EnumSet<ResourceKind>,
}

impl RegionReport {
    /// The report for `kind`, if it was processed.
    #[must_use]
    pub fn kind(&self, kind: ResourceKind) -> Option<&KindReport> {
        self.resources.iter().find(|report| report.kind == kind)
    }

    fn record(&mut self, report: KindReport) {
        if let TaggingOutcome::Failed { .. } = report.outcome {
            self.failed_kinds.insert(report.kind);
        }
        self.resources.push(report);
    }
}

/// The result of a run.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// The account that was reconciled.
    pub account_id: AccountId,

    /// The region that was reconciled.
    pub region: String,

    /// How the run obtained its credentials.
    pub session: SessionPlan,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run finished.
    pub finished_at: DateTime<Utc>,

    /// What was found and tagged.
    #[serde(flatten)]
    pub region_report: RegionReport,
}

/// Run against the account and region named by `invocation`.
///
/// # Errors
///
/// Returns an error if the session can't be resolved or any listing call fails. Failures to apply
/// tags are recorded in the report instead.
pub async fn run(invocation: &Invocation, config: &Config) -> Result<RunReport, Error> {
    let started_at = Utc::now();
    info!(
        account_id = %invocation.account_id,
        region = %invocation.region,
        access_role_name = ?invocation.access_role_name,
        "Starting run"
    );

    let ambient = session::ambient_sdk_config(&invocation.region).await;
    let session = Session::resolve(&aws_sdk_sts::Client::new(&ambient), invocation, config).await?;
    let sdk_config = match session {
        Session::Ambient => ambient,
        Session::AssumedRole { .. } => session.sdk_config(&invocation.region).await,
    };

    let region_report = reconcile_region(
        &aws_sdk_backup::Client::new(&sdk_config),
        &aws_sdk_ec2::Client::new(&sdk_config),
        &aws_sdk_efs::Client::new(&sdk_config),
        &config.default_tag,
    )
    .await?;

    Ok(RunReport {
        account_id: invocation.account_id.clone(),
        region: invocation.region.clone(),
        session: match session.role_arn() {
            None => SessionPlan::Ambient,
            Some(role_arn) => SessionPlan::AssumeRole {
                role_arn: role_arn.to_string(),
            },
        },
        started_at,
        finished_at: Utc::now(),
        region_report,
    })
}

/// Tag every instance, volume, and file system that no backup plan covers with `default_tag`.
///
/// Kinds are processed in turn: instances, then volumes, then file systems. A listing failure
/// stops the run, leaving any kinds already processed tagged.
///
/// # Errors
///
/// Returns an error if any listing call fails.
pub async fn reconcile_region(
    backup: &impl BackupApi,
    ec2: &impl Ec2Api,
    efs: &impl EfsApi,
    default_tag: &Tag,
) -> Result<RegionReport, Error> {
    let targets = inventory::match_targets(backup, default_tag).await?;
    let mut report = RegionReport {
        match_targets: targets.clone(),
        resources: Vec::with_capacity(3),
        failed_kinds: EnumSet::empty(),
    };

    let instances = enumerate::list_compute_instances(ec2).await?;
    report.record(
        reconcile_kind(ResourceKind::Instance, &instances, &targets, |ids| {
            apply::tag_compute_resources(ec2, ResourceKind::Instance, ids, default_tag)
        })
        .await,
    );

    let volumes = enumerate::list_block_volumes(ec2).await?;
    report.record(
        reconcile_kind(ResourceKind::Volume, &volumes, &targets, |ids| {
            apply::tag_compute_resources(ec2, ResourceKind::Volume, ids, default_tag)
        })
        .await,
    );

    let file_systems = enumerate::list_file_systems(efs).await?;
    report.record(
        reconcile_kind(ResourceKind::FileSystem, &file_systems, &targets, |ids| {
            apply::tag_file_systems(efs, ids, default_tag)
        })
        .await,
    );

    Ok(report)
}

async fn reconcile_kind<F, Fut>(
    kind: ResourceKind,
    resources: &[TaggableResource],
    targets: &MatchTargets,
    tag_uncovered: F,
) -> KindReport
where
    F: FnOnce(Vec<String>) -> Fut,
    Fut: Future<Output = Result<(), TagError>>,
{
    let uncovered = uncovered_ids(resources, targets);
    info!(
        %kind,
        scanned = resources.len(),
        uncovered = uncovered.len(),
        "Reconciled backup tags"
    );

    let outcome = if uncovered.is_empty() {
        TaggingOutcome::NotNeeded
    } else {
        match tag_uncovered(uncovered.clone()).await {
            Ok(()) => TaggingOutcome::Tagged,
            Err(error) => {
                warn!(%kind, "Continuing after tagging failure");
                TaggingOutcome::Failed {
                    reason: DisplayErrorContext(&error).to_string(),
                }
            }
        }
    };

    KindReport {
        kind,
        scanned: resources.len(),
        uncovered,
        outcome,
    }
}
