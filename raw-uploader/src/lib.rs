pub mod cli;
pub mod load_config;
pub mod report;
pub mod s3_store;

pub use cli::{run, run_with_store, Cli, Commands};
