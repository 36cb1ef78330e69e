pub mod catalog;
pub mod credential;
pub mod db;
