//! Command handlers module.
//!
//! - `run.rs`: One retention sweep
//! - `config.rs`: Configuration display command

mod config;
mod run;

// Re-export command functions
pub use config::cmd_config;
pub use run::cmd_run;
