//! UI preferences
//!
//! Only the theme is persisted, as `{"theme": "light"}`. Preferences are
//! passed into the session explicitly and never stored with catalog or cart
//! state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared::Theme;

use crate::error::{DeskError, DeskResult};

/// File name used when the host does not pick one
pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub theme: Theme,
}

impl UiPreferences {
    /// Load from file; a missing file yields defaults
    pub fn load(path: &Path) -> DeskResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| DeskError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> DeskResult<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| DeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let prefs = UiPreferences::load(&dir.path().join(PREFERENCES_FILE)).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[test]
    fn test_save_and_restore_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);

        let mut prefs = UiPreferences::default();
        assert_eq!(prefs.toggle_theme(), Theme::Dark);
        prefs.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"theme\": \"dark\""));
        assert_eq!(UiPreferences::load(&path).unwrap().theme, Theme::Dark);
    }

    #[test]
    fn test_unknown_theme_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, r#"{"theme": "sepia"}"#).unwrap();
        assert!(matches!(UiPreferences::load(&path), Err(DeskError::Config(_))));
    }

    #[test]
    fn test_empty_object_uses_default_theme() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "{}").unwrap();
        assert_eq!(UiPreferences::load(&path).unwrap(), UiPreferences::default());
    }
}
