//! Storage abstractions for service layer
//!
//! File-backed stores for small record sets that do not warrant a database.

pub mod json_map_store;
