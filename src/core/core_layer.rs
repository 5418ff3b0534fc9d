// The core module contains all business logic.
// It knows nothing about Google, HTTP or the filesystem; those live behind
// the traits in `addon::addon_ports` and are implemented in infra.

#[path = "activity/mod.rs"]
pub mod activity;

#[path = "addon/mod.rs"]
pub mod addon;
