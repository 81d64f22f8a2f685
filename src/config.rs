use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::model::Scoring;

/// User preferences from `prefs.toml`. Every field is optional; missing ones
/// fall back to the embedded constants.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub api_key: Option<String>,
  pub view_weight: Option<f64>,
  pub like_weight: Option<f64>,
  pub comment_weight: Option<f64>,
  pub short_form_threshold_secs: Option<u64>,
}

fn prefs_path() -> Option<PathBuf> {
  ProjectDirs::from("", "", "ytviral").map(|proj_dirs| proj_dirs.config_dir().join("prefs.toml"))
}

impl Config {
  pub fn load() -> Self {
    prefs_path().map(|path| Self::load_from(&path)).unwrap_or_default()
  }

  /// Missing or malformed files yield the defaults.
  pub fn load_from(path: &Path) -> Self {
    if let Ok(content) = std::fs::read_to_string(path) {
      match toml::from_str(&content) {
        Ok(config) => return config,
        Err(e) => warn!(path = %path.display(), err = %e, "config: ignoring malformed prefs"),
      }
    }
    Self::default()
  }

  /// Write to the platform config dir and return the file written.
  pub fn save(&self) -> Result<PathBuf> {
    let path = prefs_path().ok_or_else(|| anyhow!("No config directory available on this platform"))?;
    self.save_to(&path)?;
    Ok(path)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string(self).context("Failed to serialize preferences")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }

  /// Scoring with any overrides from this file applied.
  pub fn scoring(&self) -> Scoring {
    let defaults = Scoring::default();
    Scoring {
      view_weight: self.view_weight.unwrap_or(defaults.view_weight),
      like_weight: self.like_weight.unwrap_or(defaults.like_weight),
      comment_weight: self.comment_weight.unwrap_or(defaults.comment_weight),
      short_form_threshold_secs: self.short_form_threshold_secs.unwrap_or(defaults.short_form_threshold_secs),
    }
  }
}
