// Host layer - how the document host reaches the add-on.
//
// Every function the host may call by name is listed in `entry_points.rs`;
// `dispatch.rs` routes a call to the sheets or forms service.

#[path = "entry_points.rs"]
pub mod entry_points;

#[path = "dispatch.rs"]
pub mod dispatch;

#[path = "app_config.rs"]
pub mod app_config;

pub use app_config::AppConfig;
pub use dispatch::{dispatch_forms, dispatch_sheets};
pub use entry_points::{AddonVariant, EntryPoint};
