//! The payload a scheduled run is invoked with.

use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

/// The input for a run.
///
/// This is deserialized from the schedule's JSON payload:
///
/// ```
/// # use default_backup_tagger::Invocation;
/// let invocation: Invocation = serde_json::from_str(
///     r#"{ "AccountId": "123456789012", "Region": "eu-west-2" }"#,
/// ).unwrap();
/// assert_eq!(invocation.account_id.as_str(), "123456789012");
/// assert_eq!(invocation.access_role_name, None);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Invocation {
    /// The account whose resources should be tagged.
    pub account_id: AccountId,

    /// The region whose resources should be tagged.
    #[serde(deserialize_with = "non_empty")]
    pub region: String,

    /// The role to assume in `account_id`, overriding the configured organization service role.
    #[serde(default)]
    pub access_role_name: Option<String>,
}

fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: String = serde::Deserialize::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(serde::de::Error::invalid_length(0, &"a non-empty string"));
    }
    Ok(value)
}

/// A 12-digit AWS account ID.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// The account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = InvalidAccountId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref ACCOUNT_ID: Regex = Regex::new(r"^[0-9]{12}$").unwrap();
        }

        if ACCOUNT_ID.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidAccountId(s.to_string()))
        }
    }
}

impl TryFrom<String> for AccountId {
    type Error = InvalidAccountId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(account_id: AccountId) -> Self {
        account_id.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An error marker returned when a string is not a valid account ID.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid AWS account ID: {0:?} (expected 12 digits)")]
pub struct InvalidAccountId(pub String);
