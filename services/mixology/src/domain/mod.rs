pub mod normalize;
pub mod repository;
pub mod types;
