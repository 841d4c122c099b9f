pub mod error;
pub mod format;
pub mod gateway;
pub mod store;
