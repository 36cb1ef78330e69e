//! Test utilities for the Mixology service.
//!
//! Provides `MockSession` for authenticated requests and the JSON fixture loader.
//! Use from tests only, never from production code.

pub mod fixture;
pub mod session;
