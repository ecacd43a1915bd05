use crate::models::types::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color is empty")]
    Empty,
    #[error("`{0}` is not a hex color")]
    NotHex(String),
    #[error("`{0}` is larger than #ffffff")]
    OutOfRange(String),
}

/// JSON-backed bot settings. Reads are snapshots; writes are serialized
/// and only become visible once saved.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Arc<Settings>>,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = load_settings(&path);
        Self {
            path,
            current: RwLock::new(Arc::new(settings)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> Arc<Settings> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Apply `change` to a copy, persist it, then publish it. On a save
    /// error the previous settings stay in effect.
    pub async fn update<F>(&self, change: F) -> Result<Arc<Settings>, ConfigError>
    where
        F: FnOnce(&mut Settings),
    {
        let _guard = self.write_lock.lock().await;
        let mut next = Settings::clone(&self.snapshot());
        change(&mut next);
        save_settings(&self.path, &next)?;

        let next = Arc::new(next);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::clone(&next);
        Ok(next)
    }
}

/// Missing or unreadable files give the defaults.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        log::info!("No settings file at {}, using defaults", path.display());
        return Settings::default();
    }

    let parsed = fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|content| serde_json::from_str::<Settings>(&content).map_err(ConfigError::from));

    match parsed {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!(
                "Settings file {} is unreadable ({}), using defaults",
                path.display(),
                e
            );
            Settings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content)?;
    Ok(())
}

/// Accepts `#3498db`, `3498db` or `0x3498db`.
pub fn parse_embed_color(text: &str) -> Result<u32, ColorError> {
    let trimmed = text.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.is_empty() {
        return Err(ColorError::Empty);
    }
    let value =
        u32::from_str_radix(hex, 16).map_err(|_| ColorError::NotHex(trimmed.to_string()))?;
    if value > 0xFF_FFFF {
        return Err(ColorError::OutOfRange(trimmed.to_string()));
    }
    Ok(value)
}

/// A validated `/customize` request. Every field is checked before any
/// is applied, so one bad field rejects the whole change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub embed_color: Option<u32>,
    pub admin_role: Option<u64>,
}

impl SettingsChange {
    pub fn parse(embed_color: Option<&str>, admin_role: Option<u64>) -> Result<Self, ColorError> {
        let embed_color = embed_color
            .filter(|text| !text.trim().is_empty())
            .map(parse_embed_color)
            .transpose()?;
        Ok(Self {
            embed_color,
            admin_role,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.embed_color.is_none() && self.admin_role.is_none()
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(color) = self.embed_color {
            settings.embed_color = color;
        }
        if let Some(role) = self.admin_role {
            if !settings.admin_roles.contains(&role) {
                settings.admin_roles.push(role);
            }
        }
    }
}

pub fn format_embed_color(color: u32) -> String {
    format!("#{:06x}", color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::DEFAULT_EMBED_COLOR;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("bot_config.json"));
        assert_eq!(settings.report_channel, None);
        assert_eq!(settings.embed_color, 0x3498db);
        assert!(settings.admin_roles.is_empty());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot_config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot_config.json");
        let settings = Settings {
            report_channel: Some(1_385_054_169_903_140_974),
            embed_color: 0xff8800,
            admin_roles: vec![u64::MAX, 42],
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }

    #[tokio::test]
    async fn test_update_persists_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot_config.json");
        let store = SettingsStore::open(&path);
        let before = store.snapshot();

        store
            .update(|s| {
                s.report_channel = Some(99);
                s.admin_roles.push(7);
            })
            .await
            .unwrap();

        assert_eq!(before.report_channel, None);
        assert_eq!(store.snapshot().report_channel, Some(99));
        let reloaded = SettingsStore::open(&path);
        assert_eq!(reloaded.snapshot().admin_roles, vec![7]);
        assert_eq!(reloaded.snapshot().embed_color, DEFAULT_EMBED_COLOR);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("missing_dir").join("bot_config.json"));
        let result = store.update(|s| s.embed_color = 0).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
        assert_eq!(store.snapshot().embed_color, DEFAULT_EMBED_COLOR);
    }

    #[test]
    fn test_parse_embed_color() {
        assert_eq!(parse_embed_color("#3498db"), Ok(0x3498db));
        assert_eq!(parse_embed_color("FF0000"), Ok(0xff0000));
        assert_eq!(parse_embed_color("0x00ff00"), Ok(0x00ff00));
        assert_eq!(parse_embed_color("#"), Err(ColorError::Empty));
        assert_eq!(
            parse_embed_color("#zzzzzz"),
            Err(ColorError::NotHex("#zzzzzz".to_string()))
        );
        assert_eq!(
            parse_embed_color("1000000"),
            Err(ColorError::OutOfRange("1000000".to_string()))
        );
    }

    #[test]
    fn test_format_embed_color() {
        assert_eq!(format_embed_color(0x3498db), "#3498db");
        assert_eq!(format_embed_color(0xff), "#0000ff");
    }

    #[test]
    fn test_settings_change_rejects_whole_request_on_bad_color() {
        assert_eq!(
            SettingsChange::parse(Some("not-a-color"), Some(5)),
            Err(ColorError::NotHex("not-a-color".to_string()))
        );
    }

    #[test]
    fn test_settings_change_apply() {
        let change = SettingsChange::parse(Some("#00ff00"), Some(5)).unwrap();
        let mut settings = Settings::default();
        change.apply(&mut settings);
        change.apply(&mut settings);
        assert_eq!(settings.embed_color, 0x00ff00);
        assert_eq!(settings.admin_roles, vec![5]);

        let blank = SettingsChange::parse(Some("  "), None).unwrap();
        assert!(blank.is_empty());
    }
}
