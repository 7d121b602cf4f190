//! Persistent application settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the stored client ID.
pub const CLIENT_ID_ENV: &str = "LETTERBOX_GOOGLE_CLIENT_ID";

/// Environment variable that overrides the stored client secret.
pub const CLIENT_SECRET_ENV: &str = "LETTERBOX_GOOGLE_CLIENT_SECRET";

/// Settings that persist across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Google OAuth client ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Google OAuth client secret for installed-app clients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// How many inbox messages an import fetches.
    pub max_results: u32,
    /// Name used in the greeting.
    pub recipient_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            max_results: 10,
            recipient_name: "Mit".to_string(),
        }
    }
}

impl Settings {
    /// Client ID from the environment, else from the file.
    #[must_use]
    pub fn client_id(&self) -> Option<String> {
        env_value(CLIENT_ID_ENV).or_else(|| non_empty(self.client_id.as_deref()))
    }

    /// Client secret from the environment, else from the file.
    #[must_use]
    pub fn client_secret(&self) -> Option<String> {
        env_value(CLIENT_SECRET_ENV).or_else(|| non_empty(self.client_secret.as_deref()))
    }
}

fn env_value(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok().as_deref())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Location of the settings file.
pub fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("letterbox")
        .join("settings.json")
}

/// Load settings, falling back to defaults when no file exists.
pub async fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Save settings, creating the directory if needed.
pub async fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    tracing::info!("Settings saved to {:?}", path);
    Ok(())
}
