//! Collecting the tags that existing backup plans select resources by.

use tracing::{debug, info};

use crate::{
    api::{BackupApi, SelectionRef},
    pagination::collect_all,
    Error, MatchTargets, Tag,
};

/// List the IDs of every backup plan.
///
/// # Errors
///
/// Any `ListBackupPlans` failure is returned.
pub async fn list_backup_plans(api: &impl BackupApi) -> Result<Vec<String>, Error> {
    let plan_ids = collect_all(|next_token| api.backup_plans_page(next_token))
        .await
        .map_err(Error::list("backup plans"))?;
    debug!(count = plan_ids.len(), "Listed backup plans");
    Ok(plan_ids)
}

/// List the selections of every plan in `plan_ids`, in plan order.
///
/// # Errors
///
/// Any `ListBackupSelections` failure is returned.
pub async fn list_backup_selections(
    api: &impl BackupApi,
    plan_ids: &[String],
) -> Result<Vec<SelectionRef>, Error> {
    let mut selections = Vec::new();
    for plan_id in plan_ids {
        let plan_selections =
            collect_all(|next_token| api.backup_selections_page(plan_id, next_token))
                .await
                .map_err(Error::list("backup selections"))?;
        debug!(backup_plan_id = %plan_id, count = plan_selections.len(), "Listed backup selections");
        selections.extend(plan_selections);
    }
    Ok(selections)
}

/// The condition tag of each selection, in selection order.
///
/// Only the *last* tag condition of a selection is kept. Selections that select resources by
/// several tags therefore contribute just one of them, and resources carrying only one of the
/// others will be treated as uncovered. Selections with no tag conditions contribute nothing.
///
/// # Errors
///
/// Any `GetBackupSelection` failure is returned.
pub async fn condition_tags(
    api: &impl BackupApi,
    selections: &[SelectionRef],
) -> Result<Vec<Tag>, Error> {
    let mut tags = Vec::with_capacity(selections.len());
    for selection in selections {
        let conditions = api
            .selection_condition_tags(selection)
            .await
            .map_err(Error::list("backup selection conditions"))?;
        if let Some(tag) = last_condition(conditions) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

fn last_condition(conditions: Vec<Tag>) -> Option<Tag> {
    conditions.into_iter().last()
}

/// Build the match targets for a run: every selection's condition tag, then `default_tag`.
///
/// # Errors
///
/// Any failure listing plans or selections, or fetching a selection, is returned.
pub async fn match_targets(api: &impl BackupApi, default_tag: &Tag) -> Result<MatchTargets, Error> {
    let plan_ids = list_backup_plans(api).await?;
    let selections = list_backup_selections(api, &plan_ids).await?;
    let tags = condition_tags(api, &selections).await?;

    let targets = MatchTargets::new(tags, default_tag.clone());
    info!(
        plans = plan_ids.len(),
        selections = selections.len(),
        tags = %serde_json::to_string(&targets).unwrap_or_default(),
        "Collected backup plan tags"
    );
    Ok(targets)
}
