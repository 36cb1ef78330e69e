pub mod bookmark;
pub mod catalog;
pub mod drink;
pub mod reference;
pub mod session;
pub mod user;
