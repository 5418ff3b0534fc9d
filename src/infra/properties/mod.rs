// Document property storage.
// - `json_store.rs` keeps the properties in a JSON file next to the document data.
// - `in_memory.rs` keeps them in a DashMap; test builds only.

#[path = "json_store.rs"]
pub mod json_store;

#[cfg(test)]
#[path = "in_memory.rs"]
pub mod in_memory;

#[cfg(test)]
pub use in_memory::InMemoryPropertyStore;
pub use json_store::JsonPropertyStore;
