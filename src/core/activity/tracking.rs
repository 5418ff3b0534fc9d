// Verified/issued tracking for sheets.
// When an "issued" column is configured, only verified rows that were not issued
// yet are sent, and sent rows are marked "Y" afterwards so a re-run skips them.

use super::activity_models::{ActivityEvent, ActivityField, CellValue};
use super::dynamic_resolver::{find_property, DynamicProperty};
use crate::core::addon::{SheetError, TabularDataSource};

const YES: &str = "Y";

/// Verified is "Y" (any case) and issued is empty or anything but "Y".
pub fn is_eligible(event: &ActivityEvent) -> bool {
    let verified = event.get(ActivityField::Verified).unwrap_or_default();
    let issued = event.get(ActivityField::Issued).unwrap_or_default();

    let is_verified = !verified.is_empty() && verified.eq_ignore_ascii_case(YES);
    let not_issued = issued.is_empty() || !issued.eq_ignore_ascii_case(YES);
    is_verified && not_issued
}

pub fn issued_property(dynamic: &[DynamicProperty]) -> Option<&DynamicProperty> {
    find_property(dynamic, ActivityField::Issued)
}

/// Drops ineligible rows. A no-op unless an issued column is configured.
pub fn filter_unissued(
    events: Vec<ActivityEvent>,
    dynamic: &[DynamicProperty],
) -> Vec<ActivityEvent> {
    if issued_property(dynamic).is_none() {
        return events;
    }

    let total = events.len();
    let eligible: Vec<ActivityEvent> = events.into_iter().filter(is_eligible).collect();
    tracing::debug!(
        total,
        eligible = eligible.len(),
        "Filtered rows by verified/issued columns"
    );
    eligible
}

/// Copies the issued column values and sets "Y" on every sent row.
pub fn mark_issued(values: &[Vec<CellValue>], sent: &[ActivityEvent]) -> Vec<Vec<CellValue>> {
    let mut updated = values.to_vec();
    for row_index in sent.iter().filter_map(|event| event.row_index) {
        match updated.get_mut(row_index) {
            Some(row) => *row = vec![CellValue::from(YES)],
            None => tracing::warn!(row_index, "Sent row is outside the issued column range"),
        }
    }
    updated
}

/// Writes "Y" into the issued column for the sent rows; other rows are rewritten unchanged.
pub async fn write_back_issued<D>(
    sheet: &D,
    issued: &DynamicProperty,
    sent: &[ActivityEvent],
) -> Result<(), SheetError>
where
    D: TabularDataSource + ?Sized,
{
    let Some(column) = issued.column_index else {
        tracing::warn!(reference = %issued.reference, "Issued reference is not a column; skipping write-back");
        return Ok(());
    };

    let last_row = sheet.last_row().await?;
    if last_row < 2 {
        return Ok(());
    }

    let column = column as usize;
    let values = sheet.get_values(2, column, last_row - 1, 1).await?;
    sheet.set_values(2, column, mark_issued(&values, sent)).await
}
