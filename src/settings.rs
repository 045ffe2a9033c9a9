use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackSettings {
    pub tick_interval_ms: u64,
    pub event_buffer: usize,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            event_buffer: 64,
        }
    }
}

impl PlaybackSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// Query parameters for the training generator. Ranges are the generator's
/// business; only positivity is checked here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingParams {
    pub total_minutes: u32,
    pub warmup_minutes: u32,
    pub calisthenics_exercises: u32,
    pub combo_movements: u32,
    pub combo_buildup: u32,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            total_minutes: 60,
            warmup_minutes: 10,
            calisthenics_exercises: 6,
            combo_movements: 4,
            combo_buildup: 3,
        }
    }
}

impl TrainingParams {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("totalMinutes", self.total_minutes),
            ("warmupMinutes", self.warmup_minutes),
            ("calisthenicsExercises", self.calisthenics_exercises),
            ("comboMovements", self.combo_movements),
            ("comboBuildup", self.combo_buildup),
        ];
        for (name, value) in fields {
            if value == 0 {
                bail!("{name} must be a positive integer");
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub playback: PlaybackSettings,
    pub training: TrainingParams,
}

impl AppSettings {
    /// `TRAINPLAY_BASE_URL` and `TRAINPLAY_TICK_MS` win over the file.
    fn apply_env(&mut self) {
        if let Ok(base_url) = env::var("TRAINPLAY_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(raw) = env::var("TRAINPLAY_TICK_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.playback.tick_interval_ms = ms,
                _ => warn!("Ignoring invalid TRAINPLAY_TICK_MS value {:?}", raw),
            }
        }
    }
}

/// Read-only settings: defaults, then the JSON file if present, then environment.
pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let data = match &path {
            Some(path) => read_settings(path)?,
            None => with_env(AppSettings::default()),
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Resolves the settings file from an explicit path or `TRAINPLAY_CONFIG`.
    pub fn from_env(explicit: Option<PathBuf>) -> Result<Self> {
        let path = explicit.or_else(|| env::var_os("TRAINPLAY_CONFIG").map(PathBuf::from));
        Self::new(path)
    }

    pub fn settings(&self) -> AppSettings {
        self.read().clone()
    }

    pub fn api(&self) -> ApiSettings {
        self.read().api.clone()
    }

    pub fn playback(&self) -> PlaybackSettings {
        self.read().playback.clone()
    }

    pub fn training(&self) -> TrainingParams {
        self.read().training
    }

    pub fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = read_settings(path)?;
        *self.write() = data;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, AppSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn read_settings(path: &Path) -> Result<AppSettings> {
    let data = if path.exists() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(
                "Malformed settings in {} ({}); using defaults",
                path.display(),
                err
            );
            AppSettings::default()
        })
    } else {
        AppSettings::default()
    };

    Ok(with_env(data))
}

fn with_env(mut data: AppSettings) -> AppSettings {
    data.apply_env();
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(Some(dir.path().join("absent.json"))).unwrap();
        let settings = store.settings();
        assert_eq!(settings.training, TrainingParams::default());
        assert_eq!(settings.playback.event_buffer, 64);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "training": {{ "totalMinutes": 30 }}, "playback": {{ "eventBuffer": 8 }} }}"#
        )
        .unwrap();

        let store = SettingsStore::new(Some(file.path().to_path_buf())).unwrap();
        let training = store.training();
        assert_eq!(training.total_minutes, 30);
        assert_eq!(training.warmup_minutes, 10);
        assert_eq!(store.playback().event_buffer, 8);
        assert_eq!(store.playback().tick_interval_ms, 1000);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let store = SettingsStore::new(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(store.training(), TrainingParams::default());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "training": { "comboMovements": 2 } }"#).unwrap();

        let store = SettingsStore::new(Some(path.clone())).unwrap();
        assert_eq!(store.training().combo_movements, 2);

        fs::write(&path, r#"{ "training": { "comboMovements": 7 } }"#).unwrap();
        store.reload().unwrap();
        assert_eq!(store.training().combo_movements, 7);
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(TrainingParams::default().validate().is_ok());

        let params = TrainingParams {
            combo_buildup: 0,
            ..TrainingParams::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("comboBuildup"));
    }

    #[test]
    fn test_params_serialize_as_query_names() {
        let json = serde_json::to_value(TrainingParams::default()).unwrap();
        assert_eq!(json["totalMinutes"], 60);
        assert_eq!(json["calisthenicsExercises"], 6);
    }
}
