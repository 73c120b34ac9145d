use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::columns::ColumnConfig;
use crate::error::Result;
use crate::i18n::Translations;

pub const DEFAULT_DATA_ROOT: &str = "~/Documents/Invoices";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub data_root: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub columns: ColumnConfig,
    /// Overrides for the built-in English strings.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
            locale: default_locale(),
            columns: ColumnConfig::default(),
            translations: BTreeMap::new(),
        }
    }
}

impl AppSettings {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }

    pub fn translator(&self) -> Translations {
        Translations::english().merge(&self.translations)
    }
}

pub fn config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "invoice-draft", "app") {
        return proj_dirs.config_dir().join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

/// Reads settings from `path`; `None` when the file does not exist.
pub fn load_settings_from(path: &Path) -> Result<Option<AppSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let settings: AppSettings = toml::from_str(&content)?;
    settings.columns.validate()?;
    debug!(path = %path.display(), "loaded settings");
    Ok(Some(settings))
}

/// Settings from the platform config directory, or defaults.
pub fn load_settings() -> Result<AppSettings> {
    Ok(load_settings_from(&config_path())?.unwrap_or_default())
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    fs::write(path, toml_str)?;
    Ok(())
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Translator;
    use crate::model::{EntityKind, LineItemField};

    #[test]
    fn minimal_settings_fill_defaults() {
        let settings: AppSettings = toml::from_str(r#"data_root = "/tmp/invoices""#).unwrap();
        assert_eq!(settings.locale, "en");
        assert_eq!(settings.columns, ColumnConfig::default());
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/invoices"));
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let mut settings = AppSettings::default();
        settings.columns.quote = Some(vec![LineItemField::Description, LineItemField::LineTotal]);
        settings
            .translations
            .insert("add_item".to_string(), "New line".to_string());

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: AppSettings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
        assert_eq!(back.columns.fields(EntityKind::Quote).len(), 2);
        assert_eq!(back.translator().t("add_item"), "New line");
    }

    #[test]
    fn paths_without_tilde_are_unchanged() {
        assert_eq!(expand_home_dir("/srv/data"), "/srv/data");
    }
}
