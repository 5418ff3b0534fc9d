//! User-facing messages for API responses.

use super::activity_models::{ApiErrorResponse, ErrorDetail};

/// Summary shown after a successful sheet run.
pub fn sent_rows_message(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("Sent {} row{}.", count, plural)
}

/// Header paragraph followed by one block per detail error.
pub fn format_api_error(response: &ApiErrorResponse) -> String {
    response
        .errors
        .iter()
        .fold(format!("An error occurred: {}\n\n", response.message), append_error)
}

pub fn append_error(mut message: String, error: &ErrorDetail) -> String {
    message.push_str(&format!("Property: {}\n", error.property));
    message.push_str(&format!("Reason: {}\n\n", error.message));
    message
}

/// Formats a non-200 response. Bodies that are not the API's error JSON are shown raw.
pub fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => format_api_error(&parsed),
        Err(err) => {
            tracing::warn!(status, error = %err, "Error response is not the expected JSON shape");
            format!("An error occurred: HTTP {}\n\n{}", status, body)
        }
    }
}
