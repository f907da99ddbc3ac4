use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scoring::IndustryAverages;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unable to read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is not valid JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Operator settings shared with the desktop front-end.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub industry_averages: IndustryAverages,
}

impl Settings {
    /// Reads the settings file. A relative `dbPath` is resolved against the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings =
            serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        settings.db_path = settings
            .db_path
            .filter(|db_path| !db_path.as_os_str().is_empty())
            .map(|db_path| match path.parent() {
                Some(base) if db_path.is_relative() => base.join(db_path),
                _ => db_path,
            });

        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file yields empty settings.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
