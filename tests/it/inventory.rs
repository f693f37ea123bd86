use default_backup_tagger::{
    api::SelectionRef,
    inventory::{condition_tags, list_backup_plans, list_backup_selections, match_targets},
    Tag,
};

use crate::common::{default_tag, tags, FakeBackup};

fn backup() -> FakeBackup {
    FakeBackup::default()
        .with_selection("plan-a", "sel-1", tags(&[("Plan", "Gold")]))
        .with_selection("plan-a", "sel-2", tags(&[("Plan", "Gold")]))
        .with_selection("plan-a", "sel-3", tags(&[("Plan", "Silver"), ("Tier", "Two")]))
        .with_selection("plan-b", "sel-4", vec![])
        .with_selection("plan-c", "sel-5", tags(&[("Plan", "Bronze")]))
}

#[tokio::test]
async fn lists_every_plan_across_pages() -> Result<(), Box<dyn std::error::Error>> {
    let plan_ids = list_backup_plans(&backup()).await?;

    assert_eq!(plan_ids, ["plan-a", "plan-b", "plan-c"]);

    Ok(())
}

#[tokio::test]
async fn paginates_selections_per_plan() -> Result<(), Box<dyn std::error::Error>> {
    let backup = backup();
    let plan_ids = list_backup_plans(&backup).await?;

    let selections = list_backup_selections(&backup, &plan_ids).await?;

    assert_eq!(
        selections
            .iter()
            .map(|selection| (
                selection.backup_plan_id.as_str(),
                selection.selection_id.as_str()
            ))
            .collect::<Vec<_>>(),
        vec![
            ("plan-a", "sel-1"),
            ("plan-a", "sel-2"),
            ("plan-a", "sel-3"),
            ("plan-b", "sel-4"),
            ("plan-c", "sel-5"),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn keeps_one_tag_per_selection() -> Result<(), Box<dyn std::error::Error>> {
    let backup = backup();
    let selections: Vec<_> = [
        ("plan-a", "sel-1"),
        ("plan-a", "sel-2"),
        ("plan-a", "sel-3"),
        ("plan-b", "sel-4"),
    ]
    .iter()
    .map(|(backup_plan_id, selection_id)| SelectionRef {
        backup_plan_id: (*backup_plan_id).to_string(),
        selection_id: (*selection_id).to_string(),
    })
    .collect();

    let tags = condition_tags(&backup, &selections).await?;

    // Duplicates are kept, multi-tag selections keep their last tag, and empty ones add nothing.
    assert_eq!(
        tags,
        vec![
            Tag::new("Plan", "Gold"),
            Tag::new("Plan", "Gold"),
            Tag::new("Tier", "Two"),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn default_tag_is_appended() -> Result<(), Box<dyn std::error::Error>> {
    let targets = match_targets(&backup(), &default_tag()).await?;

    assert_eq!(
        targets.tags(),
        &[
            Tag::new("Plan", "Gold"),
            Tag::new("Plan", "Gold"),
            Tag::new("Tier", "Two"),
            Tag::new("Plan", "Bronze"),
            default_tag(),
        ][..]
    );

    Ok(())
}

#[tokio::test]
async fn no_plans_leaves_only_the_default_tag() -> Result<(), Box<dyn std::error::Error>> {
    let targets = match_targets(&FakeBackup::default(), &default_tag()).await?;

    assert_eq!(targets.tags(), &[default_tag()][..]);

    Ok(())
}
