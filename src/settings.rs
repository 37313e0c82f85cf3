use crate::error::SettingsError;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Log filter used when `RUST_LOG` is unset, e.g. "debug" or "treegen=trace"
    pub log_level: Option<String>,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderSettings {
    pub viewer: Option<String>,  // Program that opens a PNG path, e.g. "feh"
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("treegen")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Settings, toml::de::Error> {
        toml::from_str(content)
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = parse("").unwrap();
        assert_eq!(settings.server.bind, default_bind());
        assert!(settings.log_level.is_none());
        assert!(settings.render.viewer.is_none());
    }

    #[test]
    fn test_full_settings() {
        let settings = parse(
            r#"
            log_level = "debug"

            [server]
            bind = "0.0.0.0:8080"

            [render]
            viewer = "feh"
            "#,
        )
        .unwrap();
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.server.bind, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.render.viewer.as_deref(), Some("feh"));
    }

    #[test]
    fn test_invalid_settings_are_errors() {
        assert!(parse("[server]\nbind = \"not an address\"").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(Path::new("/nonexistent/treegen/config.toml")).unwrap();
        assert_eq!(settings.server.bind, default_bind());
    }
}
