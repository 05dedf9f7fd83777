//! Tick-indexed input used to drive headless sessions.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use invaders_core::InputEvent;
use serde::Deserialize;

/// Input batches keyed by the zero-based tick that polls them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputScript {
    batches: BTreeMap<u64, Vec<InputEvent>>,
}

#[derive(Debug, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    tick: Vec<ScriptEntry>,
}

#[derive(Debug, Deserialize)]
struct ScriptEntry {
    at: u64,
    events: Vec<InputEvent>,
}

impl InputScript {
    /// Creates a script without any input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `events` to the batch polled on tick `at`.
    #[must_use]
    pub fn with_batch(mut self, at: u64, events: impl IntoIterator<Item = InputEvent>) -> Self {
        self.batches.entry(at).or_default().extend(events);
        self
    }

    /// Parses a script from TOML.
    ///
    /// ```toml
    /// [[tick]]
    /// at = 0
    /// events = [{ key_down = "left" }]
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ScriptFile =
            toml::from_str(contents).context("failed to parse input script toml contents")?;
        Ok(file
            .tick
            .into_iter()
            .fold(Self::new(), |script, entry| {
                script.with_batch(entry.at, entry.events)
            }))
    }

    /// Reads and parses the script stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid input script at {}", path.display()))
    }

    /// Input polled on tick `at`.
    #[must_use]
    pub fn batch(&self, at: u64) -> Vec<InputEvent> {
        self.batches.get(&at).cloned().unwrap_or_default()
    }

    /// Last tick that receives input, if any.
    #[must_use]
    pub fn last_tick(&self) -> Option<u64> {
        self.batches.keys().next_back().copied()
    }
}
