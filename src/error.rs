use crate::{api::BoxError, AccountId, ConfigError, ResourceKind};

/// An error that aborts a run.
///
/// None of these are retried. Tagging failures are not represented here, since they are reported
/// without stopping the run (see [`TagError`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The calling identity could not be determined.
    #[error("failed to identify the calling account")]
    CallerIdentity(#[source] BoxError),

    /// The target account differs from the caller's, but no role name is available to assume.
    #[error(
        "account {account_id} is not the caller's account, but no AccessRoleName was given and \
         OrganizationServiceRole is not set"
    )]
    MissingRoleName {
        /// The target account.
        account_id: AccountId,
    },

    /// Assuming the role in the target account failed.
    #[error("failed to assume role {role_arn}")]
    AssumeRole {
        /// The ARN of the role.
        role_arn: String,

        /// The underlying provider error.
        #[source]
        source: BoxError,
    },

    /// A listing call failed.
    #[error("failed to list {what}")]
    List {
        /// What was being listed.
        what: &'static str,

        /// The underlying provider error.
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub(crate) fn list(what: &'static str) -> impl FnOnce(BoxError) -> Self {
        move |source| Self::List { what, source }
    }
}

/// Describes a failure to apply the default tag to resources of one kind.
///
/// The whole call is treated as failed: the provider may have tagged some of `resource_ids` before
/// failing, but that is not tracked.
#[derive(Debug, thiserror::Error)]
#[error("failed to tag {} {kind} resource(s)", .resource_ids.len())]
pub struct TagError {
    /// The kind of the resources being tagged.
    pub kind: ResourceKind,

    /// The resources the tag was being applied to.
    pub resource_ids: Vec<String>,

    /// The underlying provider error.
    #[source]
    pub source: BoxError,
}
