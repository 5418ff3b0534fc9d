// The infra module contains implementations of core traits.
// Each collaborator implementation goes in its own submodule.

#[path = "properties/mod.rs"]
pub mod properties;

#[path = "sheets/mod.rs"]
pub mod sheets;

#[path = "activity_api/mod.rs"]
pub mod activity_api;

#[path = "notifications/mod.rs"]
pub mod notifications;

#[path = "ui/mod.rs"]
pub mod ui;
