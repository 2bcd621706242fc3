#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::{AgentConfig, BrowserKind, BrowserSettings, Selectors};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CLOCK_AGENT_CONFIG";

pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| toml_config::DEFAULT_CONFIG_PATH.to_string())
}
