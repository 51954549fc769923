/// Client configuration, read from a TOML file.
///
/// The file lives in the user's config directory:
/// - Linux: ~/.config/gallery-admin/config.toml
/// - macOS: ~/Library/Application Support/gallery-admin/config.toml
/// - Windows: %APPDATA%\gallery-admin\config.toml
///
/// `GALLERY_ADMIN_CONFIG` points at another file, `GALLERY_ADMIN_SESSION`
/// replaces the session cookie.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{AdminError, Result};

/// Gallery server connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the gallery server, e.g. `https://pics.example.com`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Raw `Cookie` header value carrying the server session
    /// (e.g. `session=...`). Copied from a logged-in browser.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Route opened in the browser when the session expires.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_login_path() -> String {
    "/hello".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            login_path: default_login_path(),
        }
    }
}

/// Background polling intervals.
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_session_check")]
    pub session_check_secs: u64,
    #[serde(default = "default_stats_refresh")]
    pub stats_refresh_secs: u64,
}

fn default_session_check() -> u64 {
    60
}

fn default_stats_refresh() -> u64 {
    5 * 60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            session_check_secs: default_session_check(),
            stats_refresh_secs: default_stats_refresh(),
        }
    }
}

impl PollingConfig {
    pub fn session_check_interval(&self) -> Duration {
        Duration::from_secs(self.session_check_secs)
    }

    pub fn stats_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.stats_refresh_secs)
    }
}

/// Interface behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Fetch thumbnails only when they scroll into view. When off, every
    /// thumbnail is fetched as soon as the list renders.
    #[serde(default = "default_lazy_images")]
    pub lazy_images: bool,
    /// Where exports are saved. Defaults to the system downloads folder.
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,
}

fn default_lazy_images() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            lazy_images: default_lazy_images(),
            downloads_dir: None,
        }
    }
}

impl UiConfig {
    /// Resolve the export directory, falling back to the home directory
    /// and finally the working directory.
    pub fn downloads_dir(&self) -> PathBuf {
        self.downloads_dir
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; stdout only when absent.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("GALLERY_ADMIN_CONFIG") {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("gallery-admin");
        path.push("config.toml");
        path
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load from the default location, with environment overrides applied.
    /// A missing file is not an error: defaults are used.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AdminError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides.
    ///
    /// - `GALLERY_ADMIN_SESSION`: session cookie header value
    pub fn apply_env_overrides(&mut self) {
        if let Ok(cookie) = std::env::var("GALLERY_ADMIN_SESSION") {
            if !cookie.is_empty() {
                self.server.session_cookie = Some(cookie);
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AdminError::Config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.polling.session_check_secs == 0 || self.polling.stats_refresh_secs == 0 {
            return Err(AdminError::Config(
                "polling intervals must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed server base URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.server.base_url)
            .map_err(|e| AdminError::Config(format!("invalid base_url {:?}: {e}", self.server.base_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.base_url, "http://localhost:5000");
        assert_eq!(config.server.login_path, "/hello");
        assert!(config.server.session_cookie.is_none());
        assert_eq!(config.polling.session_check_secs, 60);
        assert_eq!(config.polling.stats_refresh_secs, 300);
        assert!(config.ui.lazy_images);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
            [server]
            base_url = "https://pics.example.com"
            session_cookie = "session=abc"

            [ui]
            lazy_images = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://pics.example.com");
        assert_eq!(config.server.session_cookie.as_deref(), Some("session=abc"));
        assert_eq!(config.server.login_path, "/hello");
        assert!(!config.ui.lazy_images);
        assert_eq!(config.polling.session_check_secs, 60);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[server\nbase_url = 1").unwrap_err();
        assert!(matches!(err, AdminError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.server.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.server.base_url = "ftp://pics.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.polling.stats_refresh_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[polling]\nsession_check_secs = 15").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.polling.session_check_secs, 15);
        assert_eq!(config.polling.session_check_interval(), Duration::from_secs(15));
    }

    #[test]
    fn test_downloads_dir_override() {
        let mut config = UiConfig::default();
        config.downloads_dir = Some(PathBuf::from("/tmp/exports"));
        assert_eq!(config.downloads_dir(), PathBuf::from("/tmp/exports"));
    }
}
