#![allow(dead_code)]

use async_trait::async_trait;
use clock_agent::config::Selectors;
use clock_agent::domain::model::Secret;
use clock_agent::domain::ports::{BrowserDriver, CredentialStore, DriverError, Notifier};
use clock_agent::{AgentConfig, AgentError, AgentSettings, ClockAgent};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub const CONFIG: &str = r#"
["sign in"]
url = "https://acme.example.com"
email = "//input[@id='email']"
username = "jane@acme.example.com"
password = "//input[@id='password']"
signin = "//button[@type='submit']"

["clock tile"]
title = "//div[@class='clock-tile']"
clock-in = "//button[@id='clockin']"
start-break = "//button[@id='startbreak']"
clock-out = "//button[@id='clockout']"
clock-out_confirmation = "//button[text()='Yes']"

["left pane"]
username = "//span[@class='user-name']"

[logout]
logout_arrow = "//i[@class='arrow']"
logout = "//a[text()='Logout']"
"#;

pub const EMAIL: &str = "//input[@id='email']";
pub const PASSWORD: &str = "//input[@id='password']";
pub const SIGNIN: &str = "//button[@type='submit']";
pub const TITLE: &str = "//div[@class='clock-tile']";
pub const CLOCK_IN: &str = "//button[@id='clockin']";
pub const START_BREAK: &str = "//button[@id='startbreak']";
pub const CLOCK_OUT: &str = "//button[@id='clockout']";
pub const CONFIRM: &str = "//button[text()='Yes']";
pub const LEFT_PANE: &str = "//span[@class='user-name']";
pub const LOGOUT_ARROW: &str = "//i[@class='arrow']";
pub const LOGOUT: &str = "//a[text()='Logout']";

pub fn selectors() -> Selectors {
    AgentConfig::from_toml_str(CONFIG)
        .expect("fixture config parses")
        .selectors
}

/// What the fake page looks like and everything done to it.
#[derive(Debug, Default)]
pub struct PageState {
    pub present: HashSet<String>,
    /// Selectors that show up once this much (tokio) time has passed.
    pub appear_after: HashMap<String, Duration>,
    /// Selectors that show up after this many reloads.
    pub appear_after_reloads: HashMap<String, u32>,
    /// Clicking the key swaps the page: (removed, added).
    pub on_click: HashMap<String, (Vec<String>, Vec<String>)>,
    pub failing_clicks: HashSet<String>,
    pub open_failures: u32,

    pub is_open: bool,
    pub opened_urls: Vec<String>,
    pub close_count: u32,
    pub reload_count: u32,
    pub clicks: Vec<String>,
    pub typed: Vec<(String, String)>,
    pub waits: Vec<String>,
    pub contains_calls: Vec<String>,
}

#[derive(Clone)]
pub struct FakeBrowser {
    pub state: Arc<Mutex<PageState>>,
    started: Instant,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState::default())),
            started: Instant::now(),
        }
    }

    /// A page on which the whole happy path is available.
    pub fn with_app_loaded() -> Self {
        let browser = Self::new();
        browser.show(&[EMAIL, PASSWORD, SIGNIN, LEFT_PANE, TITLE, LOGOUT_ARROW, LOGOUT]);
        browser
    }

    pub fn show(&self, selectors: &[&str]) {
        let mut state = self.state.lock().unwrap();
        for selector in selectors {
            state.present.insert(selector.to_string());
        }
    }

    pub fn hide(&self, selector: &str) {
        self.state.lock().unwrap().present.remove(selector);
    }

    pub fn on_click(&self, selector: &str, removed: &[&str], added: &[&str]) {
        self.state.lock().unwrap().on_click.insert(
            selector.to_string(),
            (
                removed.iter().map(|s| s.to_string()).collect(),
                added.iter().map(|s| s.to_string()).collect(),
            ),
        );
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap()
    }

    fn is_present(&self, state: &PageState, selector: &str) -> bool {
        if state.present.contains(selector) {
            return true;
        }
        if let Some(after) = state.appear_after.get(selector) {
            if self.started.elapsed() >= *after {
                return true;
            }
        }
        matches!(state.appear_after_reloads.get(selector), Some(n) if state.reload_count >= *n)
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    async fn open(&mut self, url: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.opened_urls.push(url.to_string());
        if state.open_failures > 0 {
            state.open_failures -= 1;
            return Err(DriverError::Session("net::ERR_INTERNET_DISCONNECTED".to_string()));
        }
        state.is_open = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.close_count += 1;
        state.is_open = false;
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), DriverError> {
        self.state.lock().unwrap().reload_count += 1;
        Ok(())
    }

    async fn wait_until_visible(&mut self, selector: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        state.waits.push(selector.to_string());
        if self.is_present(&state, selector) {
            Ok(())
        } else {
            Err(DriverError::Timeout {
                selector: selector.to_string(),
                seconds: 20,
            })
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_clicks.contains(selector) {
            return Err(DriverError::Command(format!("element not interactable: {}", selector)));
        }
        state.clicks.push(selector.to_string());
        if let Some((removed, added)) = state.on_click.get(selector).cloned() {
            for s in removed {
                state.present.remove(&s);
            }
            state.present.extend(added);
        }
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), DriverError> {
        self.state
            .lock()
            .unwrap()
            .typed
            .push((selector.to_string(), text.to_string()));
        Ok(())
    }

    async fn contains_element(&mut self, selector: &str) -> Result<bool, DriverError> {
        let mut state = self.state.lock().unwrap();
        state.contains_calls.push(selector.to_string());
        Ok(self.is_present(&state, selector))
    }
}

#[derive(Clone, Default)]
pub struct StaticCredentials {
    pub lookups: Arc<Mutex<Vec<(String, String)>>>,
    pub missing: bool,
}

impl CredentialStore for StaticCredentials {
    fn get_password(&self, service: &str, account: &str) -> clock_agent::Result<Secret> {
        self.lookups
            .lock()
            .unwrap()
            .push((service.to_string(), account.to_string()));
        if self.missing {
            return Err(AgentError::Credential {
                service: service.to_string(),
                account: account.to_string(),
                message: "No matching entry found in secure storage".to_string(),
            });
        }
        Ok(Secret::new("s3cret"))
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn message(&self, title: &str, text: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), text.to_string()));
    }
}

pub type TestAgent = ClockAgent<FakeBrowser, StaticCredentials, RecordingNotifier>;

pub fn agent(browser: &FakeBrowser, notifier: &RecordingNotifier) -> TestAgent {
    ClockAgent::new(
        selectors(),
        browser.clone(),
        StaticCredentials::default(),
        notifier.clone(),
        AgentSettings::default(),
    )
}
