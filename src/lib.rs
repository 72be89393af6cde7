pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod parser;
pub mod query;
pub mod schema;
pub mod writer;

pub use cli::Cli;
pub use config::Config;
pub use error::{Result, SyncError};
