//! sea-orm entities for the Mixology database.

pub mod bookmarks;
pub mod categories;
pub mod drink_ingredients;
pub mod drinks;
pub mod glasses;
pub mod ingredients;
pub mod instructions;
pub mod languages;
pub mod users;
