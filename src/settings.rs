//! Persisted script library and engine settings (JSON).

use crate::engine::EngineConfig;
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One saved script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptInfo {
    pub name: String,
    /// Raw script text.
    pub script: String,
    /// Hotkey description owned by the UI layer (e.g. `"Ctrl+F1"`).
    pub hotkey: Option<String>,
    pub line_delay_ms: u64,
}

impl ScriptInfo {
    pub fn line_delay(&self) -> Duration {
        Duration::from_millis(self.line_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scripts: Vec<ScriptInfo>,
    /// Pause before the first line of every run.
    pub script_start_delay_ms: u64,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a saved script by name, ignoring case.
    pub fn find_script(&self, name: &str) -> Option<&ScriptInfo> {
        self.scripts
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            start_delay: Duration::from_millis(self.script_start_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("automate-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_missing_file_is_default() {
        let settings = Settings::load(&temp_path("missing.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip.json");
        let settings = Settings {
            scripts: vec![ScriptInfo {
                name: "Farm".to_string(),
                script: "KeyPress F\nWait 500\nCall 1\n".to_string(),
                hotkey: Some("Ctrl+F1".to_string()),
                line_delay_ms: 25,
            }],
            script_start_delay_ms: 1000,
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
        assert_eq!(loaded.find_script("farm").unwrap().line_delay(), Duration::from_millis(25));
        assert_eq!(loaded.engine_config().start_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"scripts":[{"name":"a","script":"Stop"}]}"#).unwrap();
        assert_eq!(settings.scripts[0].line_delay_ms, 0);
        assert_eq!(settings.scripts[0].hotkey, None);
        assert_eq!(settings.script_start_delay_ms, 0);
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, SettingsError::Json { .. }));
    }
}
