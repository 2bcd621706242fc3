use crate::config::{BrowserKind, BrowserSettings};
use crate::domain::ports::{BrowserDriver, DriverError};
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

const VISIBILITY_POLL: Duration = Duration::from_millis(250);

/// [`BrowserDriver`] over a W3C WebDriver server (chromedriver, geckodriver).
pub struct WebDriverBrowser {
    settings: BrowserSettings,
    client: Option<Client>,
}

impl WebDriverBrowser {
    pub fn new(settings: BrowserSettings) -> Self {
        Self {
            settings,
            client: None,
        }
    }

    fn client(&self) -> Result<&Client, DriverError> {
        self.client.as_ref().ok_or(DriverError::NotOpen)
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        match self.settings.name {
            BrowserKind::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if self.settings.headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            BrowserKind::Firefox => {
                let mut args = Vec::new();
                if self.settings.headless {
                    args.push("--headless".to_string());
                }
                caps.insert("browserName".to_string(), json!("firefox"));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

fn command_error(err: fantoccini::error::CmdError) -> DriverError {
    DriverError::Command(err.to_string())
}

#[async_trait]
impl BrowserDriver for WebDriverBrowser {
    async fn open(&mut self, url: &str) -> Result<(), DriverError> {
        self.close().await?;

        debug!("Connecting to WebDriver at {}", self.settings.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.settings.webdriver_url)
            .await
            .map_err(|e| DriverError::Session(e.to_string()))?;
        let client = self.client.insert(client);

        client
            .goto(url)
            .await
            .map_err(|e| DriverError::Session(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        match self.client.take() {
            Some(client) => client.close().await.map_err(command_error),
            None => Ok(()),
        }
    }

    async fn reload(&mut self) -> Result<(), DriverError> {
        self.client()?.refresh().await.map_err(command_error)
    }

    async fn wait_until_visible(&mut self, selector: &str) -> Result<(), DriverError> {
        let seconds = self.settings.wait_timeout_seconds;
        let deadline = Instant::now() + Duration::from_secs(seconds);
        let client = self.client()?;

        loop {
            let elements = client
                .find_all(Locator::XPath(selector))
                .await
                .map_err(command_error)?;
            for element in &elements {
                // The node can go stale between lookup and query; poll again.
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    selector: selector.to_string(),
                    seconds,
                });
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        self.client()?
            .find(Locator::XPath(selector))
            .await
            .map_err(command_error)?
            .click()
            .await
            .map_err(command_error)
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError> {
        let element = self
            .client()?
            .find(Locator::XPath(selector))
            .await
            .map_err(command_error)?;
        element.clear().await.map_err(command_error)?;
        element.send_keys(text).await.map_err(command_error)
    }

    async fn contains_element(&mut self, selector: &str) -> Result<bool, DriverError> {
        let elements = self
            .client()?
            .find_all(Locator::XPath(selector))
            .await
            .map_err(command_error)?;
        Ok(!elements.is_empty())
    }
}
