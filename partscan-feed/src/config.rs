use std::path::PathBuf;

use crate::error::FeedError;

/// Production spreadsheet backing the part feed.
const DEFAULT_SHEET_ID: &str = "1osWtIElVxSKtwTMQ__P_J4RX7Z-yuJuYTYbKkfd48co";
const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Which spreadsheet the catalog is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub sheet_id: String,
    pub sheet_name: String,
}

/// Where a config field's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default value.
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of each config field.
#[derive(Debug)]
pub struct ConfigSources {
    pub sheet_id: ConfigSource,
    pub sheet_name: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    feed: Option<FeedFileConfig>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct FeedFileConfig {
    sheet_id: Option<String>,
    sheet_name: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl FeedConfig {
    /// Load the feed configuration.
    ///
    /// Priority: env vars > config file > built-in defaults. Always
    /// succeeds — defaults cover every field.
    pub fn load() -> Self {
        let config = load_config_file();

        let sheet_id = std::env::var("PARTSCAN_SHEET_ID")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.sheet_id.clone()))
            .unwrap_or_else(|| DEFAULT_SHEET_ID.to_string());

        let sheet_name = std::env::var("PARTSCAN_SHEET_NAME")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.sheet_name.clone()))
            .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

        Self {
            sheet_id,
            sheet_name,
        }
    }

    /// Apply explicit values (e.g., from CLI args) on top of this config.
    pub fn with_overrides(mut self, sheet_id: Option<String>, sheet_name: Option<String>) -> Self {
        if let Some(id) = sheet_id {
            self.sheet_id = id;
        }
        if let Some(name) = sheet_name {
            self.sheet_name = name;
        }
        self
    }

    /// gviz query URL for this sheet.
    pub fn url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:json&sheet={}",
            self.sheet_id, self.sheet_name
        )
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("partscan").join("config.toml"))
}

/// Save the feed config to the config file, creating parent directories as
/// needed. Fields matching the built-in defaults are omitted from the file.
/// Returns the path the file was written to.
pub fn save_to_file(config: &FeedConfig) -> Result<PathBuf, FeedError> {
    let path = config_path()
        .ok_or_else(|| FeedError::config("Could not determine config directory"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = ConfigFile {
        feed: Some(FeedFileConfig {
            sheet_id: if config.sheet_id == DEFAULT_SHEET_ID {
                None
            } else {
                Some(config.sheet_id.clone())
            },
            sheet_name: if config.sheet_name == DEFAULT_SHEET_NAME {
                None
            } else {
                Some(config.sheet_name.clone())
            },
        }),
    };

    let toml_str = toml::to_string_pretty(&file)
        .map_err(|e| FeedError::config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

/// Determine where each config field is coming from.
pub fn config_sources() -> ConfigSources {
    let config = load_config_file();

    let sheet_id = if std::env::var("PARTSCAN_SHEET_ID").is_ok() {
        ConfigSource::EnvVar("PARTSCAN_SHEET_ID")
    } else if config.as_ref().and_then(|c| c.sheet_id.as_ref()).is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    let sheet_name = if std::env::var("PARTSCAN_SHEET_NAME").is_ok() {
        ConfigSource::EnvVar("PARTSCAN_SHEET_NAME")
    } else if config
        .as_ref()
        .and_then(|c| c.sheet_name.as_ref())
        .is_some()
    {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    ConfigSources {
        sheet_id,
        sheet_name,
    }
}

fn load_config_file() -> Option<FeedFileConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let file: ConfigFile = toml::from_str(&content).ok()?;
    file.feed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_embeds_sheet_id_and_name() {
        let config = FeedConfig {
            sheet_id: "abc123".to_string(),
            sheet_name: "Parts".to_string(),
        };
        assert_eq!(
            config.url(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:json&sheet=Parts"
        );
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let config = FeedConfig::default().with_overrides(Some("other".to_string()), None);
        assert_eq!(config.sheet_id, "other");
        assert_eq!(config.sheet_name, DEFAULT_SHEET_NAME);
    }
}
