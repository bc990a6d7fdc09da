use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PACING_MS: u64 = 300;
const DEFAULT_WEREAD_BASE_URL: &str = "https://i.weread.qq.com";
const DEFAULT_WEREAD_HOME_URL: &str = "https://weread.qq.com/";
const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1";
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Tuning configuration. Credentials come from the command line, not here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Delay before each mutating document-store call, in milliseconds
    pub pacing_ms: ConfigValue<u64>,
    /// Reading-source API root
    pub weread_base_url: ConfigValue<String>,
    /// Reading-source home page, used to scope cookies and warm the session
    pub weread_home_url: ConfigValue<String>,
    /// Document-store API root
    pub notion_base_url: ConfigValue<String>,
    /// Value of the `Notion-Version` header
    pub notion_version: ConfigValue<String>,
    /// Config file path used (if any)
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    pacing_ms: Option<u64>,
    weread_base_url: Option<String>,
    weread_home_url: Option<String>,
    notion_base_url: Option<String>,
    notion_version: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing_ms: ConfigValue::new(DEFAULT_PACING_MS, ConfigSource::Default),
            weread_base_url: ConfigValue::new(
                DEFAULT_WEREAD_BASE_URL.to_string(),
                ConfigSource::Default,
            ),
            weread_home_url: ConfigValue::new(
                DEFAULT_WEREAD_HOME_URL.to_string(),
                ConfigSource::Default,
            ),
            notion_base_url: ConfigValue::new(
                DEFAULT_NOTION_BASE_URL.to_string(),
                ConfigSource::Default,
            ),
            notion_version: ConfigValue::new(
                DEFAULT_NOTION_VERSION.to_string(),
                ConfigSource::Default,
            ),
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config.config_file = Some(path.clone());

            if let Some(pacing) = file_config.pacing_ms {
                config.pacing_ms = ConfigValue::new(pacing, ConfigSource::File);
            }
            if let Some(url) = file_config.weread_base_url {
                config.weread_base_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(url) = file_config.weread_home_url {
                config.weread_home_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(url) = file_config.notion_base_url {
                config.notion_base_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(version) = file_config.notion_version {
                config.notion_version = ConfigValue::new(version, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(pacing) = std::env::var("WEREAD_SYNC_PACING_MS") {
            let value = pacing
                .parse()
                .map_err(|_| ConfigError::InvalidValue("WEREAD_SYNC_PACING_MS", pacing))?;
            config.pacing_ms = ConfigValue::new(value, ConfigSource::Environment);
        }
        if let Ok(version) = std::env::var("WEREAD_SYNC_NOTION_VERSION") {
            config.notion_version = ConfigValue::new(version, ConfigSource::Environment);
        }

        Ok(config)
    }

    /// Config file path from `WEREAD_SYNC_CONFIG`, if set
    pub fn path_from_env() -> Option<PathBuf> {
        std::env::var("WEREAD_SYNC_CONFIG").ok().map(PathBuf::from)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/weread-sync/
    /// - macOS: ~/Library/Application Support/weread-sync/
    /// - Windows: %APPDATA%/weread-sync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weread-sync")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms.value)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(name, value) => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.pacing_ms.value, 300);
        assert_eq!(config.pacing_ms.source, ConfigSource::Default);
        assert_eq!(config.notion_version.value, "2022-06-28");
        assert_eq!(config.weread_base_url.value, "https://i.weread.qq.com");
        assert!(config.config_file.is_none());
        assert_eq!(config.pacing(), Duration::from_millis(300));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "pacing_ms: 50").unwrap();
        writeln!(file, "notion_base_url: http://localhost:9000/v1").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.pacing_ms.value, 50);
        assert_eq!(config.pacing_ms.source, ConfigSource::File);
        assert_eq!(config.notion_base_url.value, "http://localhost:9000/v1");
        assert_eq!(config.notion_base_url.source, ConfigSource::File);
        assert_eq!(config.notion_version.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "pacing_ms: 50").unwrap();

        std::env::set_var("WEREAD_SYNC_PACING_MS", "1000");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.pacing_ms.value, 1000);
        assert_eq!(config.pacing_ms.source, ConfigSource::Environment);

        std::env::remove_var("WEREAD_SYNC_PACING_MS");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "pacing_ms: soon").unwrap();

        let err = Config::load(Some(config_path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_, _)));
    }
}
