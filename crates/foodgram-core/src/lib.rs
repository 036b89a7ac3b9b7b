//! Service plumbing shared by Foodgram binaries: health probes, request ids,
//! tracing setup, serde helpers and sea-orm error helpers.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
