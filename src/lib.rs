pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use adapters::{KeyringStore, WebDriverBrowser};
pub use adapters::NativeDialog;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AgentConfig;

pub use core::{
    agent::{AgentSettings, ClockAgent},
    engine::{ClockEngine, RetryPolicy},
};
pub use domain::model::{Candidate, ClockOutcome, Direction};
pub use utils::error::{AgentError, Result};
