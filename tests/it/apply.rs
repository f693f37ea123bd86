use std::error::Error as _;

use default_backup_tagger::{
    apply::{tag_compute_resources, tag_file_systems},
    ResourceKind,
};

use crate::common::{default_tag, file_system, FakeEc2, FakeEfs};

#[tokio::test]
async fn compute_tagging_is_one_bulk_call() {
    let ec2 = FakeEc2::default();

    tag_compute_resources(
        &ec2,
        ResourceKind::Volume,
        vec!["vol-1".to_string(), "vol-2".to_string()],
        &default_tag(),
    )
    .await
    .unwrap();

    assert_eq!(
        ec2.create_tags_calls.into_inner(),
        vec![(
            vec!["vol-1".to_string(), "vol-2".to_string()],
            default_tag()
        )]
    );
}

#[tokio::test]
async fn compute_tagging_failure_carries_cause() {
    let ec2 = FakeEc2 {
        fail_create_tags: true,
        ..FakeEc2::default()
    };

    let error = tag_compute_resources(
        &ec2,
        ResourceKind::Instance,
        vec!["i-1".to_string()],
        &default_tag(),
    )
    .await
    .unwrap_err();

    assert_eq!(error.kind, ResourceKind::Instance);
    assert_eq!(error.resource_ids, ["i-1"]);
    assert_eq!(error.to_string(), "failed to tag 1 EC2 resource(s)");
    assert_eq!(
        error.source().unwrap().to_string(),
        "UnauthorizedOperation: ec2:CreateTags"
    );
}

#[tokio::test]
async fn file_systems_are_tagged_one_at_a_time() {
    let efs = FakeEfs::new(vec![file_system("fs-1", &[]), file_system("fs-2", &[])]);

    tag_file_systems(
        &efs,
        vec!["fs-1".to_string(), "fs-2".to_string()],
        &default_tag(),
    )
    .await
    .unwrap();

    assert_eq!(
        efs.tag_calls.into_inner(),
        vec![
            ("fs-1".to_string(), default_tag()),
            ("fs-2".to_string(), default_tag())
        ]
    );
}

#[tokio::test]
async fn file_system_tagging_stops_at_first_failure() {
    let efs = FakeEfs {
        fail_on: Some("fs-2".to_string()),
        ..FakeEfs::default()
    };

    let error = tag_file_systems(
        &efs,
        vec!["fs-1".to_string(), "fs-2".to_string(), "fs-3".to_string()],
        &default_tag(),
    )
    .await
    .unwrap_err();

    assert_eq!(error.kind, ResourceKind::FileSystem);
    assert_eq!(error.resource_ids, ["fs-1", "fs-2", "fs-3"]);
    assert_eq!(
        error.source().unwrap().to_string(),
        "FileSystemNotFound: fs-2"
    );
    assert_eq!(
        efs.tag_calls
            .into_inner()
            .into_iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>(),
        ["fs-1", "fs-2"]
    );
}
