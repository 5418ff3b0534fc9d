// Activity event pipeline: schema, dynamic references, payloads, tracking, messages.

pub mod activity_models;
pub mod dynamic_resolver;
pub mod payload_builder;
pub mod response_formatting;
pub mod tracking;

pub use activity_models::{
    default_properties, AddonSettings, CellValue, ConfigMap, FormResponse, TransportKey,
    TransportSettings,
};
pub use dynamic_resolver::resolve;
pub use payload_builder::{build_form_payload, build_sheet_payloads};
pub use response_formatting::{describe_failure, sent_rows_message};
pub use tracking::{filter_unissued, issued_property, write_back_issued};
