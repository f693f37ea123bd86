//! Process-wide configuration.

use crate::Tag;

/// Environment variable holding the default tag key.
pub const DEFAULT_PLAN_KEY: &str = "DefaultPlanKey";

/// Environment variable holding the default tag value.
pub const DEFAULT_PLAN_VALUE: &str = "DefaultPlanValue";

/// Environment variable holding the role name assumed in other accounts.
pub const ORGANIZATION_SERVICE_ROLE: &str = "OrganizationServiceRole";

/// Configuration shared by every run.
///
/// The values come from the environment of the hosting process (see [`Config::from_env`]) and are
/// passed explicitly to the components that need them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The tag applied to resources that no backup plan selects.
    pub default_tag: Tag,

    /// The role name to assume in a target account when the invocation doesn't name one.
    pub organization_service_role: Option<String>,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// This should be called once per invocation, so that changes to the environment between
    /// scheduled runs are picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if `DefaultPlanKey` or `DefaultPlanValue` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary lookup function.
    ///
    /// Empty values are treated as missing.
    ///
    /// # Errors
    ///
    /// Returns an error if `DefaultPlanKey` or `DefaultPlanValue` is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str| lookup(name).filter(|value| !value.is_empty());

        let key = get(DEFAULT_PLAN_KEY).ok_or(ConfigError::Missing(DEFAULT_PLAN_KEY))?;
        let value = get(DEFAULT_PLAN_VALUE).ok_or(ConfigError::Missing(DEFAULT_PLAN_VALUE))?;

        Ok(Self {
            default_tag: Tag::new(key, value),
            organization_service_role: get(ORGANIZATION_SERVICE_ROLE),
        })
    }
}

/// The error returned when the configuration is incomplete.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("environment variable {0} must be set")]
    Missing(&'static str),
}
