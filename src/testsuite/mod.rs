pub mod setup;
pub mod store;
