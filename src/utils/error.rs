use crate::domain::ports::DriverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Connectivity failure: {message}")]
    Connectivity { message: String },

    #[error("Could not reach the application after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Expected element '{selector}' did not appear ({attempts} attempt(s))")]
    UiMismatch { selector: String, attempts: u32 },

    #[error("None of the elements found within {timeout_seconds} seconds: {candidates:?}")]
    NoCandidateFound {
        timeout_seconds: u64,
        candidates: Vec<String>,
    },

    #[error("Browser driver error: {0}")]
    Driver(DriverError),

    #[error("Credential lookup failed for account '{account}' on '{service}': {message}")]
    Credential {
        service: String,
        account: String,
        message: String,
    },

    #[error("Missing configuration: [{section}] {key}")]
    MissingConfig { section: String, key: String },

    #[error("Invalid configuration value for '{field}': {reason} (value: '{value}')")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How bad a failure is; drives the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl AgentError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AgentError::Connectivity { .. } => ErrorSeverity::Medium,
            AgentError::RetriesExhausted { .. } | AgentError::Credential { .. } => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, AgentError::Connectivity { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AgentError::Connectivity { .. } | AgentError::RetriesExhausted { .. } => {
                "Check the network connection and that the WebDriver server is running"
            }
            AgentError::UiMismatch { .. } | AgentError::NoCandidateFound { .. } => {
                "The page layout may have changed; verify the XPath selectors in the configuration"
            }
            AgentError::Driver(_) => "Restart the WebDriver server and try again",
            AgentError::Credential { .. } => {
                "Store the password in the system credential store under the configured url and username"
            }
            AgentError::MissingConfig { .. }
            | AgentError::InvalidConfigValue { .. }
            | AgentError::ConfigParse { .. } => "Fix the configuration file and run again",
            AgentError::Io(_) => "Make sure the configuration file exists and is readable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AgentError::RetriesExhausted { attempts } => {
                format!("Gave up after {} connection attempts", attempts)
            }
            AgentError::NoCandidateFound { .. } => {
                "Neither expected state of the clock tile appeared".to_string()
            }
            AgentError::Credential { account, .. } => {
                format!("No stored password found for '{}'", account)
            }
            other => other.to_string(),
        }
    }
}

impl From<DriverError> for AgentError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::Timeout { selector, .. } => AgentError::UiMismatch {
                selector,
                attempts: 1,
            },
            other => AgentError::Driver(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
