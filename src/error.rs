//! Error types — every failure a battery check can surface to the user

use std::fmt;
use std::time::Duration;

/// The report document did not contain what we need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Label never appeared in a table alongside the other capacity field.
    MissingField(&'static str),
    /// Label was found but its value carried no digits.
    InvalidValue { field: &'static str, value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "field '{field}' not found in battery report"),
            Self::InvalidValue { field, value } => {
                write!(f, "field '{field}' has non-numeric value '{value}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The external report command could not produce a report.
#[derive(Debug)]
pub enum CommandError {
    Spawn { program: String, source: std::io::Error },
    Failed { program: String, code: Option<i32>, stderr: String },
    TimedOut { program: String, after: Duration },
    MissingOutput(std::path::PathBuf),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "failed to start '{program}': {source}"),
            Self::Failed { program, code, stderr } => {
                match code {
                    Some(c) => write!(f, "'{program}' exited with code {c}")?,
                    None => write!(f, "'{program}' was terminated by a signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            Self::TimedOut { program, after } => {
                write!(f, "'{program}' did not finish within {:.1}s", after.as_secs_f64())
            }
            Self::MissingOutput(path) => {
                write!(f, "report file {} was not created", path.display())
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum BatteryError {
    Permission(String),
    Command(CommandError),
    Parse(ParseError),
    Division,
    NoBattery,
    BatteryIndex { index: usize, count: usize },
    Io(std::io::Error),
}

impl BatteryError {
    /// Text shown to the user by the front end.
    pub fn user_message(&self) -> String {
        match self {
            Self::Permission(_) => "Administrator privileges are required to generate the battery report.\n\
                 Please run the application as administrator."
                .into(),
            Self::Command(CommandError::TimedOut { .. }) => {
                "Battery report generation timed out. Please try again.".into()
            }
            Self::Command(e) => format!("Could not generate the battery report: {e}"),
            Self::Parse(e) => format!("The battery report could not be read: {e}"),
            Self::Division => {
                "The battery reports a design capacity of zero, health cannot be computed.".into()
            }
            Self::NoBattery => "No battery detected in the system.\n\
                 Please ensure a battery is present and try again."
                .into(),
            Self::BatteryIndex { index, count } => {
                format!("Battery #{} does not exist ({count} installed).", index + 1)
            }
            Self::Io(e) => format!("Could not read the battery report: {e}"),
        }
    }

    /// Process exit code used by the CLI front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Permission(_) => 2,
            Self::Command(_) => 3,
            Self::Parse(_) => 4,
            Self::Division => 5,
            Self::NoBattery => 6,
            Self::BatteryIndex { .. } => 7,
            Self::Io(_) => 8,
        }
    }
}

impl fmt::Display for BatteryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission(msg) => write!(f, "Permission denied: {msg}"),
            Self::Command(e) => write!(f, "Command error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Division => write!(f, "Division error: design capacity is zero"),
            Self::NoBattery => write!(f, "No battery present"),
            Self::BatteryIndex { index, count } => {
                write!(f, "Battery index {index} out of range (found {count})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for BatteryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Command(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BatteryError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseError> for BatteryError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<CommandError> for BatteryError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}
