//! Service layer: courier record storage and the outbound prediction client.
//! - Storage is a JSON-file map; no database is involved.
//! - The prediction client never retries; one attempt per request.

pub mod courier_store;
pub mod errors;
pub mod prediction;
pub mod storage;
