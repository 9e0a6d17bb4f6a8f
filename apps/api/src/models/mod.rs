pub mod section;
pub mod user;
