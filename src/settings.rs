use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::interaction::InteractionConfig;
use crate::log_warn;
use crate::placement::PlacementConfig;
use crate::timescale::{DEFAULT_STEP, WINDOW_MINUTES};

const ENABLE_LOGS: bool = true;

/// Tunables for placement, gestures and navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub step_minutes: u32,
    pub min_duration_minutes: u32,
    pub drag_threshold_px: f64,
    pub edge_handle_px: f64,
    pub navigation_cooldown_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP,
            min_duration_minutes: 10,
            drag_threshold_px: 5.0,
            edge_handle_px: 8.0,
            navigation_cooldown_ms: 1500,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.step_minutes == 0 || WINDOW_MINUTES % self.step_minutes != 0 {
            anyhow::bail!(
                "stepMinutes must divide {} (got {})",
                WINDOW_MINUTES,
                self.step_minutes
            );
        }
        if self.min_duration_minutes < self.step_minutes {
            anyhow::bail!("minDurationMinutes must be at least stepMinutes");
        }
        if self.drag_threshold_px < 0.0 || self.edge_handle_px < 0.0 {
            anyhow::bail!("pixel thresholds must not be negative");
        }
        Ok(())
    }

    pub fn placement(&self) -> PlacementConfig {
        PlacementConfig {
            step_minutes: self.step_minutes,
            min_duration_minutes: self.min_duration_minutes,
        }
    }

    pub fn interaction(&self) -> InteractionConfig {
        InteractionConfig {
            drag_threshold_px: self.drag_threshold_px,
            edge_handle_px: self.edge_handle_px,
        }
    }

    pub fn navigation_cooldown(&self) -> Duration {
        Duration::from_millis(self.navigation_cooldown_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    engine: EngineSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    /// Open the settings file at `path`. A missing or unreadable document
    /// falls back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring malformed settings in {}: {}", path.display(), err);
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn engine(&self) -> EngineSettings {
        self.read().engine.clone()
    }

    pub fn update_engine(&self, settings: EngineSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        guard.engine = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: UserSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings in {}", self.path.display()))?;
        data.engine.validate()?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
