pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod messages;
pub mod types;
pub mod utils;
