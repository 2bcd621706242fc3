use crate::utils::error::{AgentError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: String) -> AgentError {
    AgentError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason,
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty".to_string()));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// Cheap structural check; the browser does the real XPath parsing.
pub fn validate_xpath(field_name: &str, xpath: &str) -> Result<()> {
    validate_non_empty_string(field_name, xpath)?;
    let trimmed = xpath.trim_start();
    if !(trimmed.starts_with('/') || trimmed.starts_with('(') || trimmed.starts_with('.')) {
        return Err(invalid(
            field_name,
            xpath,
            "XPath must start with '/', '(' or '.'".to_string(),
        ));
    }
    Ok(())
}
