//! Ambient plumbing shared by the Mixology service binaries: health probes,
//! request-id propagation, tracing setup, and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
