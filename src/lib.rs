pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod output;
pub mod profile;
pub mod ratio;
pub mod report;
pub mod store;
