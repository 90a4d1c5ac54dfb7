//! Small shared containers.

/// Insertion-ordered, name-keyed map.
pub mod list_map;

pub use list_map::ListMap;
