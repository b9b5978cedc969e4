//! Navigation policy: selection mode, flip direction, step bounds,
//! timing.
//!
//! Both axes are closed enums with exhaustive matches at every
//! consumption site; invalid strings are rejected at the
//! [`FromStr`]/serde boundary and never silently defaulted.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::FlipError;

/// Axis and sense of one flip step.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Rotate about the horizontal axis, new face entering from above.
    #[default]
    Down,
    /// Rotate about the horizontal axis, new face entering from below.
    Up,
    /// Rotate about the vertical axis, new face entering from the right.
    Left,
    /// Rotate about the vertical axis, new face entering from the left.
    Right,
}

impl Direction {
    /// Whether this direction belongs to the vertical family (rotation
    /// about the X axis).
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

impl FromStr for Direction {
    type Err = FlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(FlipError::UnknownDirection(other.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// How the next candidate is chosen when no explicit target is given.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Sequential loop in insertion order.
    #[default]
    Loop,
    /// Uniform random selection.
    Random,
}

impl FromStr for SelectionMode {
    type Err = FlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loop" => Ok(Self::Loop),
            "random" => Ok(Self::Random),
            other => Err(FlipError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loop => "loop",
            Self::Random => "random",
        })
    }
}

/// Immutable policy snapshot passed into each flip call.
///
/// Built from [`FlipOptions`](crate::options::FlipOptions) plus per-call
/// overrides at the moment `flip()` is invoked, so a session never
/// observes mid-flight configuration changes.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPolicy {
    /// How the next candidate is chosen.
    pub mode: SelectionMode,
    /// Whether the next candidate must differ from the current one.
    pub distinct: bool,
    /// Minimum number of hops a non-direct flip must take.
    pub min_steps: u32,
    /// Maximum number of hops per flip; `None` is unbounded.
    pub max_steps: Option<u32>,
    /// Flip direction for every step of the session.
    pub direction: Direction,
    /// Duration of one step's animation. Zero still completes - it is an
    /// animation that finishes immediately, not "no animation".
    pub step_duration: Duration,
    /// Explicit perspective distance in host units; `None` derives it
    /// from the container size.
    pub perspective: Option<f32>,
}

impl NavigationPolicy {
    /// Check the `min_steps <= max_steps` invariant.
    ///
    /// # Errors
    ///
    /// [`FlipError::PolicyRange`] when `min_steps` exceeds a finite
    /// `max_steps`. The violation is reported, never clamped.
    pub fn validate(&self) -> Result<(), FlipError> {
        match self.max_steps {
            Some(max) if self.min_steps > max => Err(FlipError::PolicyRange {
                min: self.min_steps,
                max,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Loop,
            distinct: true,
            min_steps: 0,
            max_steps: None,
            direction: Direction::Down,
            step_duration: Duration::from_millis(500),
            perspective: None,
        }
    }
}
