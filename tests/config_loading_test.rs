mod common;

use clock_agent::utils::validation::Validate;
use clock_agent::{AgentConfig, AgentError};
use std::io::Write;
use tempfile::NamedTempFile;

const REQUIRED: &[(&str, &[(&str, &str)])] = &[
    (
        "sign in",
        &[
            ("url", "https://acme.example.com"),
            ("email", "//input[@id='email']"),
            ("username", "jane@acme.example.com"),
            ("password", "//input[@id='password']"),
            ("signin", "//button[@type='submit']"),
        ],
    ),
    (
        "clock tile",
        &[
            ("title", "//div[@class='clock-tile']"),
            ("clock-in", "//button[@id='clockin']"),
            ("start-break", "//button[@id='startbreak']"),
            ("clock-out", "//button[@id='clockout']"),
            ("clock-out_confirmation", "//button[text()='Yes']"),
        ],
    ),
    ("left pane", &[("username", "//span[@class='user-name']")]),
    (
        "logout",
        &[
            ("logout_arrow", "//i[@class='arrow']"),
            ("logout", "//a[text()='Logout']"),
        ],
    ),
];

/// Renders the required configuration, leaving out `skip` if given.
fn render(skip: Option<(&str, &str)>) -> String {
    let mut out = String::new();
    for (section, entries) in REQUIRED {
        out.push_str(&format!("[\"{}\"]\n", section));
        for (key, value) in entries.iter() {
            if skip == Some((*section, *key)) {
                continue;
            }
            out.push_str(&format!("{} = \"{}\"\n", key, value));
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_complete_config_loads_and_validates() {
    let config = AgentConfig::from_toml_str(&render(None)).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.selectors, common::selectors());
}

#[test]
fn test_every_required_key_is_enforced() {
    for (section, entries) in REQUIRED {
        for (key, _) in entries.iter() {
            let err = AgentConfig::from_toml_str(&render(Some((*section, *key))))
                .expect_err("config without a required key must not load");
            match err {
                AgentError::MissingConfig {
                    section: ref s,
                    key: ref k,
                } => {
                    assert_eq!(s, section);
                    assert_eq!(k, key);
                }
                other => panic!("[{section}] {key}: unexpected error {other:?}"),
            }
        }
    }
}

#[test]
fn test_missing_section_is_reported() {
    let content = render(None).replace("[\"left pane\"]", "[\"right pane\"]");
    let err = AgentConfig::from_toml_str(&content).unwrap_err();
    assert!(
        matches!(err, AgentError::MissingConfig { ref section, .. } if section == "left pane")
    );
}

#[test]
fn test_load_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(render(None).as_bytes()).unwrap();

    let config = AgentConfig::from_file(file.path()).unwrap();
    assert_eq!(config.get("logout", "logout").unwrap(), "//a[text()='Logout']");
    assert_eq!(config.sections().len(), 4);
}
