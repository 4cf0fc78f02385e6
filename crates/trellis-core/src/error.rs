//! Error types for Trellis core.

use std::fmt;

/// Errors produced by the core crate.
#[derive(Debug)]
pub enum CoreError {
    /// The periodic timer thread could not be spawned.
    TimerSpawn(std::io::Error),
    /// A textual widget id could not be parsed.
    InvalidWidgetId(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimerSpawn(err) => write!(f, "Failed to spawn periodic timer thread: {err}"),
            Self::InvalidWidgetId(text) => write!(f, "Invalid widget id: {text:?}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TimerSpawn(err) => Some(err),
            Self::InvalidWidgetId(_) => None,
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
