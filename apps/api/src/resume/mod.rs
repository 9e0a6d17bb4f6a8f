pub mod aggregate;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod payload;
pub mod postgres;
pub mod progress;
pub mod repository;
pub mod schema;
pub mod store;
