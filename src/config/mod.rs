//! Configuration loading and management for the roster engine.
//!
//! Configuration is read once from a directory of YAML files and then passed
//! explicitly into each calculation; nothing here is global.
//!
//! # Example
//!
//! ```no_run
//! use roster_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Max continuous work: {} minutes", config.rules().max_continuous_minutes);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineConfig, RulesConfig, SettlementConfig};
