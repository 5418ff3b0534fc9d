// Domain models for the activity event pipeline.
// Nothing in here knows about Google, HTTP or files - only the shapes that flow
// from the document properties and the sheet/form into the outbound payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The persisted document properties: a flat string map, saved wholesale by the settings UI.
pub type ConfigMap = BTreeMap<String, String>;

// ============================================================================
// SCHEMA
// ============================================================================

/// Every field the activity event API accepts in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityField {
    ActivityId,
    ActivityTime,
    Text1,
    Text2,
    Email,
    UserId,
    FirstName,
    LastName,
    Int1,
    Int2,
    Date1,
    Verified,
    Issued,
}

impl ActivityField {
    pub const ALL: [ActivityField; 13] = [
        ActivityField::ActivityId,
        ActivityField::ActivityTime,
        ActivityField::Text1,
        ActivityField::Text2,
        ActivityField::Email,
        ActivityField::UserId,
        ActivityField::FirstName,
        ActivityField::LastName,
        ActivityField::Int1,
        ActivityField::Int2,
        ActivityField::Date1,
        ActivityField::Verified,
        ActivityField::Issued,
    ];

    /// The property/wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityField::ActivityId => "activityId",
            ActivityField::ActivityTime => "activityTime",
            ActivityField::Text1 => "text1",
            ActivityField::Text2 => "text2",
            ActivityField::Email => "email",
            ActivityField::UserId => "userId",
            ActivityField::FirstName => "firstName",
            ActivityField::LastName => "lastName",
            ActivityField::Int1 => "int1",
            ActivityField::Int2 => "int2",
            ActivityField::Date1 => "date1",
            ActivityField::Verified => "verified",
            ActivityField::Issued => "issued",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == key)
    }
}

impl fmt::Display for ActivityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Properties that shape the request itself. They never end up in a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKey {
    ApiKey,
    ApiUrl,
    ApiToken,
}

impl TransportKey {
    pub const ALL: [TransportKey; 3] = [
        TransportKey::ApiKey,
        TransportKey::ApiUrl,
        TransportKey::ApiToken,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransportKey::ApiKey => "apiKey",
            TransportKey::ApiUrl => "apiUrl",
            TransportKey::ApiToken => "apiToken",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

/// Credentials and endpoint for the activity event API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportSettings {
    pub api_key: String,
    pub api_url: String,
    pub api_token: String,
}

impl TransportSettings {
    /// All three of URL, token and key are required before any request is made.
    pub fn is_complete(&self) -> bool {
        [&self.api_url, &self.api_token, &self.api_key]
            .iter()
            .all(|value| !value.is_empty())
    }
}

/// The document properties split by the schema into transport settings and body fields.
#[derive(Debug, Clone, Default)]
pub struct AddonSettings {
    pub transport: TransportSettings,
    /// Configured body values, literal or `{{token}}`, in property order.
    pub fields: Vec<(ActivityField, String)>,
}

impl AddonSettings {
    pub fn from_properties(properties: &ConfigMap) -> Self {
        let mut settings = Self::default();

        for (key, value) in properties {
            if let Some(transport_key) = TransportKey::from_key(key) {
                let slot = match transport_key {
                    TransportKey::ApiKey => &mut settings.transport.api_key,
                    TransportKey::ApiUrl => &mut settings.transport.api_url,
                    TransportKey::ApiToken => &mut settings.transport.api_token,
                };
                *slot = value.clone();
            } else if let Some(field) = ActivityField::from_key(key) {
                settings.fields.push((field, value.clone()));
            } else {
                tracing::debug!(key = %key, "Ignoring property outside the add-on schema");
            }
        }

        settings
    }
}

/// Every known property with an empty value, so the settings form renders all inputs.
pub fn default_properties() -> ConfigMap {
    TransportKey::ALL
        .iter()
        .map(|key| key.as_str())
        .chain(ActivityField::ALL.iter().map(|field| field.as_str()))
        .map(|key| (key.to_string(), String::new()))
        .collect()
}

// ============================================================================
// PAYLOAD
// ============================================================================

/// One outbound record for the activity event API (`CreateActivityEvent`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityEvent {
    #[serde(flatten)]
    fields: BTreeMap<ActivityField, String>,
    /// 0-based position in the sheet data slice; used for the issued write-back.
    #[serde(rename = "rowIndex", skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
}

impl ActivityEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_row(row_index: usize) -> Self {
        Self {
            fields: BTreeMap::new(),
            row_index: Some(row_index),
        }
    }

    pub fn get(&self, field: ActivityField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: ActivityField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn is_set(&self, field: ActivityField) -> bool {
        self.fields.contains_key(&field)
    }
}

// ============================================================================
// DATA SOURCES
// ============================================================================

/// Renders a timestamp the way the host renders dates: `Tue, 15 Nov 1994 08:12:31 GMT`.
pub fn to_utc_string(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

// Display is the payload stringification: dates as UTC strings, everything else as-is.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Number(number) => write!(f, "{}", number),
            CellValue::Bool(flag) => write!(f, "{}", flag),
            CellValue::Date(at) => f.write_str(&to_utc_string(at)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Date(value)
    }
}

/// One answered question of a form submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub title: String,
    pub response: String,
}

/// A form submission as delivered by the form-submit trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub form_id: String,
    #[serde(default)]
    pub respondent_email: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub item_responses: Vec<ItemResponse>,
}

// ============================================================================
// API RESPONSES
// ============================================================================

/// Error body returned by the activity event API on a non-200 response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorDetail {
    pub property: String,
    pub message: String,
}
