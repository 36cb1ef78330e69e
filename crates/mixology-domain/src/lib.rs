//! Domain types shared across the Mixology crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never depend on `infra/` from here.

pub mod language;
pub mod pagination;
pub mod text;
