//! Resolving the credentials a run operates with.

use std::{fmt, time::SystemTime};

use aws_config::{BehaviorVersion, Region, SdkConfig};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{api::StsApi, Config, Error, Invocation};

/// The role session name used when assuming a role in another account.
pub const ROLE_SESSION_NAME: &str = "default-backup-tagger";

/// Temporary credentials issued by `AssumeRole`.
#[derive(Clone)]
pub struct TemporaryCredentials {
    /// The access key ID.
    pub access_key_id: String,

    /// The secret access key.
    pub secret_access_key: String,

    /// The session token.
    pub session_token: String,

    /// When the credentials expire, if known.
    pub expiration: Option<DateTime<Utc>>,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// How a session should be obtained for an invocation.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionPlan {
    /// The caller already operates in the target account.
    Ambient,

    /// The target account is different, so a role in it must be assumed.
    AssumeRole {
        /// The ARN of the role to assume.
        role_arn: String,
    },
}

impl SessionPlan {
    /// Decide how to obtain a session for `invocation`, given the caller's account.
    ///
    /// When the accounts differ the invocation's `AccessRoleName` is used, falling back to the
    /// configured organization service role.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRoleName`] if a role must be assumed but no name is available.
    pub fn new(
        caller_account_id: &str,
        invocation: &Invocation,
        config: &Config,
    ) -> Result<Self, Error> {
        if caller_account_id == invocation.account_id.as_str() {
            return Ok(Self::Ambient);
        }

        let role_name = invocation
            .access_role_name
            .as_deref()
            .or(config.organization_service_role.as_deref())
            .ok_or_else(|| Error::MissingRoleName {
                account_id: invocation.account_id.clone(),
            })?;
        Ok(Self::AssumeRole {
            role_arn: format!("arn:aws:iam::{}:role/{}", invocation.account_id, role_name),
        })
    }
}

/// The identity a run operates with.
#[derive(Clone, Debug)]
pub enum Session {
    /// The ambient credentials of the process.
    Ambient,

    /// Temporary credentials from an assumed role.
    AssumedRole {
        /// The ARN of the assumed role.
        role_arn: String,

        /// The issued credentials.
        credentials: TemporaryCredentials,
    },
}

impl Session {
    /// Resolve the session for `invocation`.
    ///
    /// # Errors
    ///
    /// Any failure to identify the caller or to assume the role is returned. These are not
    /// retried.
    pub async fn resolve(
        sts: &impl StsApi,
        invocation: &Invocation,
        config: &Config,
    ) -> Result<Self, Error> {
        let caller_account_id = sts
            .caller_account_id()
            .await
            .map_err(Error::CallerIdentity)?;

        match SessionPlan::new(&caller_account_id, invocation, config)? {
            SessionPlan::Ambient => {
                info!(account_id = %caller_account_id, "Using ambient credentials");
                Ok(Self::Ambient)
            }
            SessionPlan::AssumeRole { role_arn } => {
                info!(
                    caller_account_id = %caller_account_id,
                    role_arn = %role_arn,
                    "Assuming role in target account"
                );
                let credentials = sts
                    .assume_role(&role_arn, ROLE_SESSION_NAME)
                    .await
                    .map_err(|source| Error::AssumeRole {
                        role_arn: role_arn.clone(),
                        source,
                    })?;
                if let Some(expiration) = credentials.expiration {
                    info!(role_arn = %role_arn, %expiration, "Assumed role");
                }
                Ok(Self::AssumedRole {
                    role_arn,
                    credentials,
                })
            }
        }
    }

    /// The ARN of the assumed role, if any.
    #[must_use]
    pub fn role_arn(&self) -> Option<&str> {
        match self {
            Self::Ambient => None,
            Self::AssumedRole { role_arn, .. } => Some(role_arn),
        }
    }

    /// Build an SDK configuration for `region` using this session's identity.
    pub async fn sdk_config(&self, region: &str) -> SdkConfig {
        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        match self {
            Self::Ambient => loader.load().await,
            Self::AssumedRole { credentials, .. } => {
                let credentials = aws_sdk_sts::config::Credentials::new(
                    credentials.access_key_id.clone(),
                    credentials.secret_access_key.clone(),
                    Some(credentials.session_token.clone()),
                    credentials.expiration.map(SystemTime::from),
                    "AssumeRole",
                );
                loader.credentials_provider(credentials).load().await
            }
        }
    }
}

/// Load the SDK configuration of the hosting process, scoped to `region`.
pub async fn ambient_sdk_config(region: &str) -> SdkConfig {
    Session::Ambient.sdk_config(region).await
}
