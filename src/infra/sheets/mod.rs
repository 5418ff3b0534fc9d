#[path = "json_sheet.rs"]
pub mod json_sheet;

pub use json_sheet::JsonSheet;
