//! Resource tags and the set of tags that mark a resource as covered by a backup plan.

/// A resource tag.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// The tag key.
    pub key: String,

    /// The tag value.
    pub value: String,
}

impl Tag {
    /// Construct a tag from a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// EC2 tags have optional keys and values in the SDK model; tags missing either are skipped.
    pub(crate) fn from_ec2(tag: &aws_sdk_ec2::types::Tag) -> Option<Self> {
        Some(Self::new(tag.key()?, tag.value()?))
    }

    pub(crate) fn to_ec2(&self) -> aws_sdk_ec2::types::Tag {
        aws_sdk_ec2::types::Tag::builder()
            .key(&self.key)
            .value(&self.value)
            .build()
    }

    pub(crate) fn from_efs(tag: &aws_sdk_efs::types::Tag) -> Self {
        Self::new(tag.key(), tag.value())
    }

    pub(crate) fn to_efs(
        &self,
    ) -> Result<aws_sdk_efs::types::Tag, aws_sdk_efs::error::BuildError> {
        aws_sdk_efs::types::Tag::builder()
            .key(&self.key)
            .value(&self.value)
            .build()
    }

    pub(crate) fn from_backup_condition(condition: &aws_sdk_backup::types::Condition) -> Self {
        Self::new(condition.condition_key(), condition.condition_value())
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// The tags a resource may carry to count as covered by a backup plan.
///
/// This is built once per run from the condition tags of every backup selection, with the
/// configured default tag appended last. It is never modified afterwards.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct MatchTargets(Vec<Tag>);

impl MatchTargets {
    /// Build the match targets from backup selection tags and the default tag.
    pub fn new(selection_tags: impl IntoIterator<Item = Tag>, default_tag: Tag) -> Self {
        let mut tags: Vec<_> = selection_tags.into_iter().collect();
        tags.push(default_tag);
        Self(tags)
    }

    /// The target tags, in the order they were collected.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.0
    }

    /// Whether any of `resource_tags` equals any target tag.
    ///
    /// Both the key and the value must match; a resource carrying a target key with a different
    /// value is not covered.
    #[must_use]
    pub fn covers(&self, resource_tags: &[Tag]) -> bool {
        self.0
            .iter()
            .any(|target| resource_tags.iter().any(|tag| tag == target))
    }
}
