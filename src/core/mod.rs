pub mod agent;
pub mod engine;

pub use crate::domain::model::{Candidate, ClockOutcome, Direction};
pub use crate::domain::ports::{BrowserDriver, CredentialStore, DriverError, Notifier};
pub use crate::utils::error::Result;
