//! Data models
//!
//! Shared between the floor server and the floor UI (via API).
//! Rows are decoded leniently (snake_case, camelCase and hybrid column
//! names are all accepted) and always serialized in camelCase.

pub mod area;
pub mod dining_table;
pub mod reservation;
pub mod serde_helpers;

// Re-exports
pub use area::*;
pub use dining_table::*;
pub use reservation::*;
