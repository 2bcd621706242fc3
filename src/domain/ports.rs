use crate::domain::model::Secret;
use crate::utils::error::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("could not start browser session: {0}")]
    Session(String),

    #[error("element '{selector}' not visible after {seconds}s")]
    Timeout { selector: String, seconds: u64 },

    #[error("browser command failed: {0}")]
    Command(String),

    #[error("no browser session is open")]
    NotOpen,
}

/// The slice of a browser automation engine the agent drives.
/// Every selector is an XPath expression.
#[async_trait]
pub trait BrowserDriver: Send {
    async fn open(&mut self, url: &str) -> std::result::Result<(), DriverError>;
    /// Ends the session. Closing when nothing is open is a no-op.
    async fn close(&mut self) -> std::result::Result<(), DriverError>;
    async fn reload(&mut self) -> std::result::Result<(), DriverError>;
    async fn wait_until_visible(&mut self, selector: &str) -> std::result::Result<(), DriverError>;
    async fn click(&mut self, selector: &str) -> std::result::Result<(), DriverError>;
    async fn type_text(&mut self, selector: &str, text: &str)
        -> std::result::Result<(), DriverError>;
    async fn contains_element(&mut self, selector: &str) -> std::result::Result<bool, DriverError>;
}

pub trait CredentialStore: Send + Sync {
    fn get_password(&self, service: &str, account: &str) -> Result<Secret>;
}

/// A blocking modal message; returns once the user dismisses it.
pub trait Notifier: Send + Sync {
    fn message(&self, title: &str, text: &str);
}
