pub mod config;
pub mod errors;
pub mod executor;
pub mod report;
pub mod script;
pub mod suite;
pub mod types;
