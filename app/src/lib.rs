pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod service;
pub mod store;
