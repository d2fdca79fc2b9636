use crate::errors::{MediaError, MediaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Read-only source of site-wide upload configuration. Injected into the
/// uploader instead of being read from ambient global state so tests can
/// supply arbitrary values.
pub trait SettingsProvider: Send + Sync {
    /// Site-wide maximum upload size in bytes. 0 means no limit.
    fn max_upload_size(&self) -> u64;

    /// Extension-to-MIME-type allow-list for the current user. `None` means
    /// the site does not restrict upload types.
    fn allowed_mime_types(&self) -> Option<HashMap<String, String>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub max_upload_size: u64,
    #[serde(default)]
    pub allowed_mime_types: Option<HashMap<String, String>>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            max_upload_size: 0,
            allowed_mime_types: None,
        }
    }
}

impl SettingsProvider for SiteSettings {
    fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    fn allowed_mime_types(&self) -> Option<HashMap<String, String>> {
        self.allowed_mime_types.clone()
    }
}

fn settings_path() -> MediaResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| MediaError::config("Could not find config directory"))?
        .join("media-uploader");

    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("settings.json"))
}

impl SiteSettings {
    /// Load settings from the per-user config file, falling back to defaults
    /// when the file is absent or unparseable.
    pub fn load() -> MediaResult<Self> {
        let path = settings_path()?;

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let settings: SiteSettings = serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Failed to parse settings file: {}. Using defaults.", e);
                SiteSettings::default()
            });

            settings.validate()?;
            Ok(settings)
        } else {
            let defaults = SiteSettings::default();
            let raw = serde_json::to_string_pretty(&defaults)?;
            fs::write(&path, raw)?;
            log::info!("Wrote default settings to {}", path.display());
            Ok(defaults)
        }
    }

    pub fn validate(&self) -> MediaResult<()> {
        if let Some(allowed) = &self.allowed_mime_types {
            for (ext, mime) in allowed {
                if !mime.contains('/') {
                    return Err(MediaError::Config(format!(
                        "allowed_mime_types entry '{}' has malformed MIME type '{}'",
                        ext, mime
                    )));
                }
            }
        }
        Ok(())
    }
}
