//! Host configuration snapshot with TOML preset support.
//!
//! The configuration surface is owned by the host's attribute layer and
//! consumed read-only by the engine: a [`FlipOptions`] value is turned
//! into a concrete [`NavigationPolicy`] at each `flip()` call, so
//! sessions never observe mid-flight configuration changes. All fields
//! use `#[serde(default)]` so partial TOML presets (e.g. only overriding
//! `direction`) work correctly.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::FlipError;
use crate::policy::{Direction, NavigationPolicy, SelectionMode};

/// Host-facing configuration for a flip container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct FlipOptions {
    /// Selection mode for derived targets and intermediate hops.
    pub mode: SelectionMode,
    /// Distinctness requirement. `None` defaults to "required whenever
    /// more than one candidate exists".
    pub distinct: Option<bool>,
    /// Minimum hops per non-direct flip.
    pub min_steps: u32,
    /// Maximum hops per flip; `None` is unbounded.
    pub max_steps: Option<u32>,
    /// Flip direction.
    pub direction: Direction,
    /// Step animation duration in milliseconds.
    pub duration_ms: u64,
    /// Explicit perspective distance in host units; `None` derives it
    /// from the container size.
    pub perspective: Option<f32>,
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Loop,
            distinct: None,
            min_steps: 0,
            max_steps: None,
            direction: Direction::Down,
            duration_ms: 500,
            perspective: None,
        }
    }
}

impl FlipOptions {
    /// Generate JSON Schema describing the configuration surface, for
    /// host-side options UIs.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(FlipOptions)
    }

    /// Validate the configuration.
    ///
    /// Step-count and duration fields are unsigned by construction, so
    /// the only representable range violation is `min_steps` exceeding a
    /// finite `max_steps`.
    ///
    /// # Errors
    ///
    /// [`FlipError::PolicyRange`] when `min_steps > max_steps`.
    pub fn validate(&self) -> Result<(), FlipError> {
        self.policy_for(0).validate()
    }

    /// Concrete policy snapshot for the given candidate count.
    ///
    /// The distinctness default depends on the count: with one candidate
    /// or none there is no distinct alternative to require.
    #[must_use]
    pub fn policy_for(&self, candidate_count: usize) -> NavigationPolicy {
        NavigationPolicy {
            mode: self.mode,
            distinct: self.distinct.unwrap_or(candidate_count > 1),
            min_steps: self.min_steps,
            max_steps: self.max_steps,
            direction: self.direction,
            step_duration: Duration::from_millis(self.duration_ms),
            perspective: self.perspective,
        }
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`FlipError::Io`] when the file cannot be read,
    /// [`FlipError::OptionsParse`] on malformed TOML or unknown
    /// mode/direction strings, [`FlipError::PolicyRange`] on an invalid
    /// step range - configuration errors surface here, not at flip time.
    pub fn load(path: &Path) -> Result<Self, FlipError> {
        let content = std::fs::read_to_string(path).map_err(FlipError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| FlipError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`FlipError::OptionsParse`] on serialization failure,
    /// [`FlipError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), FlipError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FlipError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(FlipError::Io)?;
        }
        std::fs::write(path, content).map_err(FlipError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
