pub mod adapters;
pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
