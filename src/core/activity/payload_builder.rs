// Payload building: turns sheet rows or a form submission into activity events.
//
// Precedence for every field is the same on both variants:
// dynamic value first, then whatever the submission itself provides (forms),
// then the configured literal. A configured literal never overwrites a value
// that is already there. Form payloads fall back to empty name fields.

use super::activity_models::{
    to_utc_string, ActivityEvent, ActivityField, AddonSettings, CellValue, FormResponse,
};
use super::dynamic_resolver::{resolve, DynamicProperty};
use crate::core::addon::{SheetError, TabularDataSource};

// ============================================================================
// SHEETS
// ============================================================================

/// Reads every data row (row 1 is the header) and builds one event per row.
pub async fn build_sheet_payloads<D>(
    settings: &AddonSettings,
    sheet: &D,
) -> Result<Vec<ActivityEvent>, SheetError>
where
    D: TabularDataSource + ?Sized,
{
    let last_row = sheet.last_row().await?;
    let last_column = sheet.last_column().await?;
    if last_row < 2 || last_column == 0 {
        tracing::debug!(last_row, last_column, "Sheet has no data rows");
        return Ok(Vec::new());
    }

    let rows = sheet.get_values(2, 1, last_row - 1, last_column).await?;
    Ok(build_row_payloads(settings, &rows))
}

/// Builds one event per row. `rows[0]` becomes `rowIndex` 0.
pub fn build_row_payloads(settings: &AddonSettings, rows: &[Vec<CellValue>]) -> Vec<ActivityEvent> {
    let dynamic = resolve(settings);
    let columns = column_bindings(&dynamic);

    rows.iter()
        .enumerate()
        .map(|(row_index, cells)| {
            let mut event = ActivityEvent::for_row(row_index);
            for (position, cell) in cells.iter().enumerate() {
                for (field, _) in columns.iter().filter(|(_, column)| *column == position) {
                    event.set(*field, cell.to_string());
                }
            }
            with_static_data(event, settings)
        })
        .collect()
}

/// Pairs each dynamic field with its 0-based column position.
fn column_bindings(dynamic: &[DynamicProperty]) -> Vec<(ActivityField, usize)> {
    dynamic
        .iter()
        .filter_map(|property| match property.column_index {
            Some(column) => Some((property.field, column as usize - 1)),
            None => {
                tracing::warn!(
                    field = %property.field,
                    reference = %property.reference,
                    "Dynamic reference is not a column letter; it will not be read from the sheet"
                );
                None
            }
        })
        .collect()
}

/// Fills every still-unset body field with its configured value.
pub fn with_static_data(mut event: ActivityEvent, settings: &AddonSettings) -> ActivityEvent {
    for (field, value) in &settings.fields {
        if !event.is_set(*field) {
            event.set(*field, value.clone());
        }
    }
    event
}

// ============================================================================
// FORMS
// ============================================================================

/// Finds an answer for each dynamic field by question title.
///
/// A question matches when its lower-cased title occurs in the lower-cased
/// reference; the first match wins. Fields without a match are left out and
/// keep their configured token.
pub fn resolve_form_answers(
    settings: &AddonSettings,
    response: &FormResponse,
) -> Vec<(ActivityField, String)> {
    let dynamic = resolve(settings);
    if dynamic.is_empty() {
        return Vec::new();
    }

    let questions: Vec<(String, &str)> = response
        .item_responses
        .iter()
        .map(|item| (item.title.to_lowercase(), item.response.as_str()))
        .collect();

    dynamic
        .iter()
        .filter_map(|property| {
            let reference = property.reference.to_lowercase();
            match questions.iter().find(|(title, _)| reference.contains(title.as_str())) {
                Some((_, answer)) => Some((property.field, answer.to_string())),
                None => {
                    tracing::warn!(
                        field = %property.field,
                        reference = %property.reference,
                        "No form question matches the dynamic reference; sending the token as-is"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Builds the event for a single form submission.
pub fn build_form_payload(settings: &AddonSettings, response: &FormResponse) -> ActivityEvent {
    let mut event = ActivityEvent::new();
    for (field, answer) in resolve_form_answers(settings, response) {
        event.set(field, answer);
    }

    let submitted = [
        (ActivityField::ActivityTime, to_utc_string(&response.timestamp)),
        (ActivityField::Email, response.respondent_email.clone()),
        (ActivityField::UserId, response.respondent_email.clone()),
        (ActivityField::Text2, response.form_id.clone()),
    ];
    for (field, value) in submitted {
        if !value.is_empty() && !event.is_set(field) {
            event.set(field, value);
        }
    }

    let mut event = with_static_data(event, settings);
    for field in [ActivityField::FirstName, ActivityField::LastName] {
        if !event.is_set(field) {
            event.set(field, "");
        }
    }
    event
}
