//! Crate-level error types.

use std::fmt;

/// Errors produced by the flipkit crate.
#[derive(Debug)]
pub enum FlipError {
    /// An explicit navigation target did not resolve to any candidate.
    TargetNotFound(String),
    /// A selection-mode string did not name a known mode.
    UnknownMode(String),
    /// A direction string did not name a known flip direction.
    UnknownDirection(String),
    /// A policy violated the `min_steps <= max_steps` invariant.
    PolicyRange {
        /// Configured minimum hop count.
        min: u32,
        /// Configured maximum hop count.
        max: u32,
    },
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure while loading or saving option presets.
    Io(std::io::Error),
}

impl fmt::Display for FlipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNotFound(reference) => {
                write!(f, "target candidate does not exist: {reference}")
            }
            Self::UnknownMode(mode) => {
                write!(f, "invalid selection mode: {mode}")
            }
            Self::UnknownDirection(direction) => {
                write!(f, "invalid flip direction: {direction}")
            }
            Self::PolicyRange { min, max } => {
                write!(f, "min_steps ({min}) exceeds max_steps ({max})")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for FlipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlipError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_reference() {
        let err = FlipError::TargetNotFound("value \"c\"".into());
        assert!(err.to_string().contains("value \"c\""));
    }

    #[test]
    fn policy_range_reports_both_bounds() {
        let err = FlipError::PolicyRange { min: 5, max: 2 };
        let msg = err.to_string();
        assert!(msg.contains('5') && msg.contains('2'));
    }
}
