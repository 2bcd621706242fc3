use std::fmt;

/// Which action the run performs; fixed by the CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClockIn,
    ClockOut,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ClockIn => write!(f, "Clocking in"),
            Direction::ClockOut => write!(f, "Clocking out"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOutcome {
    /// The requested button was clicked.
    Clocked,
    /// The page already showed the requested state; nothing was clicked.
    AlreadyDone,
}

/// A named selector raced against others in `ClockAgent::check_exists`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub selector: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
        }
    }
}

/// A password fetched from the credential store. Never printed.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}
