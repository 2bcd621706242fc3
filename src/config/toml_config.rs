use crate::utils::error::{AgentError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_DIALOG_TITLE: &str = "Clock Agent";

/// One `[section]` of the configuration file, keys in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl ConfigSection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInSelectors {
    pub url: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub signin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTileSelectors {
    pub title: String,
    pub clock_in: String,
    pub start_break: String,
    pub clock_out: String,
    pub clock_out_confirmation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftPaneSelectors {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutSelectors {
    pub logout_arrow: String,
    pub logout: String,
}

/// Everything the agent clicks, types into or waits for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub sign_in: SignInSelectors,
    pub clock_tile: ClockTileSelectors,
    pub left_pane: LeftPaneSelectors,
    pub logout: LogoutSelectors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl FromStr for BrowserKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            other => Err(AgentError::InvalidConfigValue {
                field: "browser.name".to_string(),
                value: other.to_string(),
                reason: "Supported browsers: chrome, firefox".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub name: BrowserKind,
    pub headless: bool,
    pub wait_timeout_seconds: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            name: BrowserKind::Chrome,
            headless: false,
            wait_timeout_seconds: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    sections: Vec<ConfigSection>,
    pub selectors: Selectors,
    pub browser: BrowserSettings,
    pub dialog_title: String,
}

impl AgentConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut table: toml::Table =
            toml::from_str(content).map_err(|e| AgentError::ConfigParse {
                message: e.to_string(),
            })?;
        for (_, value) in table.iter_mut() {
            substitute_in_value(value);
        }

        let mut sections = Vec::with_capacity(table.len());
        let mut browser = BrowserSettings::default();
        for (name, value) in table {
            let entries = match value {
                toml::Value::Table(entries) => entries,
                other => {
                    return Err(AgentError::InvalidConfigValue {
                        field: name,
                        value: other.to_string(),
                        reason: "Top-level entries must be sections".to_string(),
                    })
                }
            };

            if name == "browser" {
                browser = toml::Value::Table(entries.clone())
                    .try_into()
                    .map_err(|e: toml::de::Error| AgentError::ConfigParse {
                        message: format!("[browser] {}", e),
                    })?;
            }

            let entries = entries
                .into_iter()
                .map(|(key, value)| {
                    let rendered = scalar_to_string(&name, &key, value)?;
                    Ok((key, rendered))
                })
                .collect::<Result<Vec<_>>>()?;
            sections.push(ConfigSection { name, entries });
        }

        let selectors = resolve_selectors(&sections)?;
        let dialog_title = sections
            .iter()
            .find(|s| s.name == "dialog")
            .and_then(|s| s.get("title"))
            .unwrap_or(DEFAULT_DIALOG_TITLE)
            .to_string();

        Ok(Self {
            sections,
            selectors,
            browser,
            dialog_title,
        })
    }


    pub fn sections(&self) -> &[ConfigSection] {
        &self.sections
    }

    pub fn get(&self, section: &str, key: &str) -> Result<&str> {
        lookup(&self.sections, section, key)
    }
}

impl Validate for AgentConfig {
    fn validate(&self) -> Result<()> {
        let s = &self.selectors;
        validation::validate_url("sign in.url", &s.sign_in.url)?;
        validation::validate_non_empty_string("sign in.username", &s.sign_in.username)?;

        let xpaths = [
            ("sign in.email", &s.sign_in.email),
            ("sign in.password", &s.sign_in.password),
            ("sign in.signin", &s.sign_in.signin),
            ("clock tile.title", &s.clock_tile.title),
            ("clock tile.clock-in", &s.clock_tile.clock_in),
            ("clock tile.start-break", &s.clock_tile.start_break),
            ("clock tile.clock-out", &s.clock_tile.clock_out),
            (
                "clock tile.clock-out_confirmation",
                &s.clock_tile.clock_out_confirmation,
            ),
            ("left pane.username", &s.left_pane.username),
            ("logout.logout_arrow", &s.logout.logout_arrow),
            ("logout.logout", &s.logout.logout),
        ];
        for (field, xpath) in xpaths {
            validation::validate_xpath(field, xpath)?;
        }

        validation::validate_url("browser.webdriver_url", &self.browser.webdriver_url)?;
        validation::validate_positive_number(
            "browser.wait_timeout_seconds",
            self.browser.wait_timeout_seconds,
            1,
        )?;
        Ok(())
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables stay as written.
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid pattern"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

/// Substitution runs on parsed strings so values need no TOML escaping.
fn substitute_in_value(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = substitute_env_vars(s),
        toml::Value::Table(table) => table
            .iter_mut()
            .for_each(|(_, value)| substitute_in_value(value)),
        toml::Value::Array(items) => items.iter_mut().for_each(substitute_in_value),
        _ => {}
    }
}

fn scalar_to_string(section: &str, key: &str, value: toml::Value) -> Result<String> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        other => Err(AgentError::InvalidConfigValue {
            field: format!("{}.{}", section, key),
            value: other.to_string(),
            reason: "Values must be plain strings".to_string(),
        }),
    }
}

fn lookup<'a>(sections: &'a [ConfigSection], section: &str, key: &str) -> Result<&'a str> {
    sections
        .iter()
        .find(|s| s.name == section)
        .and_then(|s| s.get(key))
        .ok_or_else(|| AgentError::MissingConfig {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn resolve_selectors(sections: &[ConfigSection]) -> Result<Selectors> {
    let get = |section: &str, key: &str| lookup(sections, section, key).map(str::to_string);

    Ok(Selectors {
        sign_in: SignInSelectors {
            url: get("sign in", "url")?,
            email: get("sign in", "email")?,
            username: get("sign in", "username")?,
            password: get("sign in", "password")?,
            signin: get("sign in", "signin")?,
        },
        clock_tile: ClockTileSelectors {
            title: get("clock tile", "title")?,
            clock_in: get("clock tile", "clock-in")?,
            start_break: get("clock tile", "start-break")?,
            clock_out: get("clock tile", "clock-out")?,
            clock_out_confirmation: get("clock tile", "clock-out_confirmation")?,
        },
        left_pane: LeftPaneSelectors {
            username: get("left pane", "username")?,
        },
        logout: LogoutSelectors {
            logout_arrow: get("logout", "logout_arrow")?,
            logout: get("logout", "logout")?,
        },
    })
}
