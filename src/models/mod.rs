//! Domain models

pub mod book;
pub mod borrow;
pub mod student;
pub mod user;
