pub mod adapters;
pub mod cache;
pub mod source;
pub mod synthetic;
pub mod types;
