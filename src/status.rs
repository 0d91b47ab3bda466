//! JSON status file for an external renderer.
//!
//! Holds the latest update of every slot and rewrites the whole document on
//! each change. Writes go to a sibling temp file which is then renamed over
//! the target, so a reader never sees a half-written file.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::{Log, LogLevel};
use crate::render::{RenderSink, WidgetUpdate};

pub struct StatusFileSink {
    path: PathBuf,
    slots: BTreeMap<&'static str, Value>,
}

impl StatusFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slots: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(&self.slots).context("failed to serialize status")?;

        let mut temp_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        fs::write(&temp_path, content)
            .with_context(|| format!("failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl RenderSink for StatusFileSink {
    fn render(&mut self, update: &WidgetUpdate) {
        let value = match serde_json::to_value(update) {
            Ok(value) => value,
            Err(e) => {
                Log::log_widget(LogLevel::Err, "status", &format!("Cannot encode update: {}", e));
                return;
            }
        };
        self.slots.insert(update.slot(), value);

        if let Err(e) = self.write() {
            Log::log_widget(LogLevel::Warn, "status", &format!("{:#}", e));
        }
    }
}
