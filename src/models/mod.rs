pub mod batch_config;
pub mod config;

pub use batch_config::BatchConfig;
pub use config::{AppConfig, ScriptConfig};
