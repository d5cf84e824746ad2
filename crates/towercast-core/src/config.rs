use crate::error::{Result, TowercastError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "TOWERCAST_CONFIG";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has at least the same precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Settings the coverage pipeline needs to locate its external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageSettings {
    /// Propagation tool binary
    pub signal_server_path: PathBuf,
    /// Terrain (SDF) data directory handed to the tool
    pub sdf_dir: PathBuf,
    /// Directory receiving generated rasters; also served back to clients
    pub output_dir: PathBuf,
    /// Raster-to-image converter binary
    pub convert_path: PathBuf,
    /// Basename prefix for generated outputs
    pub output_prefix: String,
}

/// Layered service configuration: defaults < TOML file < environment
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: ConfigValue<u16>,
    pub signal_server_path: ConfigValue<PathBuf>,
    pub sdf_dir: ConfigValue<PathBuf>,
    pub output_dir: ConfigValue<PathBuf>,
    pub convert_path: ConfigValue<PathBuf>,
    pub output_prefix: ConfigValue<String>,
    pub database_url: ConfigValue<Option<String>>,
    pub allowed_origin_suffix: ConfigValue<String>,
}

impl ServiceConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            port: ConfigValue::new(80, ConfigSource::Default),
            signal_server_path: ConfigValue::new(
                PathBuf::from("/home/ec2-user/Signal-Server/signalserverHD"),
                ConfigSource::Default,
            ),
            sdf_dir: ConfigValue::new(PathBuf::from("/home/ec2-user/efs"), ConfigSource::Default),
            output_dir: ConfigValue::new(
                PathBuf::from("/home/ec2-user/output/"),
                ConfigSource::Default,
            ),
            convert_path: ConfigValue::new(
                PathBuf::from("/usr/bin/convert"),
                ConfigSource::Default,
            ),
            output_prefix: ConfigValue::new("output-".to_string(), ConfigSource::Default),
            database_url: ConfigValue::new(None, ConfigSource::Default),
            allowed_origin_suffix: ConfigValue::new(
                "facebook.com".to_string(),
                ConfigSource::Default,
            ),
        }
    }

    /// Defaults, then the file named by `TOWERCAST_CONFIG` (if set), then environment
    pub fn load() -> Result<Self> {
        let mut config = Self::with_defaults();

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            config = config.load_from_file(path)?;
        }

        Ok(config.load_from_env())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| TowercastError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file {}: {}", path.as_ref().display(), e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| TowercastError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(server) = file_config.server {
            if let Some(port) = server.port {
                self.port.update(port, ConfigSource::File);
            }
        }

        if let Some(coverage) = file_config.coverage {
            if let Some(path) = coverage.signal_server_path {
                self.signal_server_path.update(path, ConfigSource::File);
            }
            if let Some(dir) = coverage.sdf_dir {
                self.sdf_dir.update(dir, ConfigSource::File);
            }
            if let Some(dir) = coverage.output_dir {
                self.output_dir.update(dir, ConfigSource::File);
            }
            if let Some(path) = coverage.convert_path {
                self.convert_path.update(path, ConfigSource::File);
            }
            if let Some(prefix) = coverage.output_prefix {
                self.output_prefix.update(prefix, ConfigSource::File);
            }
        }

        if let Some(market) = file_config.market {
            if let Some(url) = market.database_url {
                self.database_url.update(Some(url), ConfigSource::File);
            }
            if let Some(suffix) = market.allowed_origin_suffix {
                self.allowed_origin_suffix.update(suffix, ConfigSource::File);
            }
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // TOWERCAST_PORT
        if let Ok(port_str) = env::var("TOWERCAST_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port.update(port, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TOWERCAST_PORT value '{}': expected a port number",
                    port_str
                ),
            }
        }

        if let Some(path) = non_empty_env("TOWERCAST_SIGNAL_SERVER") {
            self.signal_server_path.update(PathBuf::from(path), ConfigSource::Environment);
        }

        if let Some(dir) = non_empty_env("TOWERCAST_SDF_DIR") {
            self.sdf_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        if let Some(dir) = non_empty_env("TOWERCAST_OUTPUT_DIR") {
            self.output_dir.update(PathBuf::from(dir), ConfigSource::Environment);
        }

        if let Some(path) = non_empty_env("TOWERCAST_CONVERT") {
            self.convert_path.update(PathBuf::from(path), ConfigSource::Environment);
        }

        if let Some(url) = non_empty_env("DATABASE_URL") {
            self.database_url.update(Some(url), ConfigSource::Environment);
        }

        if let Some(suffix) = non_empty_env("TOWERCAST_ORIGIN_SUFFIX") {
            self.allowed_origin_suffix.update(suffix, ConfigSource::Environment);
        }

        self
    }

    /// Coverage pipeline view of the configuration
    pub fn coverage(&self) -> CoverageSettings {
        CoverageSettings {
            signal_server_path: self.signal_server_path.value.clone(),
            sdf_dir: self.sdf_dir.value.clone(),
            output_dir: self.output_dir.value.clone(),
            convert_path: self.convert_path.value.clone(),
            output_prefix: self.output_prefix.value.clone(),
        }
    }

    /// Get all configuration values as a map for inspection.
    /// The database URL is reported only as set/unset.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("port".to_string(), (self.port.value.to_string(), self.port.source));
        map.insert(
            "signal_server_path".to_string(),
            (self.signal_server_path.value.display().to_string(), self.signal_server_path.source),
        );
        map.insert(
            "sdf_dir".to_string(),
            (self.sdf_dir.value.display().to_string(), self.sdf_dir.source),
        );
        map.insert(
            "output_dir".to_string(),
            (self.output_dir.value.display().to_string(), self.output_dir.source),
        );
        map.insert(
            "convert_path".to_string(),
            (self.convert_path.value.display().to_string(), self.convert_path.source),
        );
        map.insert(
            "database_url".to_string(),
            (
                if self.database_url.value.is_some() { "set" } else { "unset" }.to_string(),
                self.database_url.source,
            ),
        );
        map.insert(
            "allowed_origin_suffix".to_string(),
            (self.allowed_origin_suffix.value.clone(), self.allowed_origin_suffix.source),
        );

        map
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration loaded from TOML file
#[derive(Debug, Default, Deserialize, Serialize)]
struct FileConfig {
    server: Option<ServerSection>,
    coverage: Option<CoverageSection>,
    market: Option<MarketSection>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ServerSection {
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct CoverageSection {
    signal_server_path: Option<PathBuf>,
    sdf_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    convert_path: Option<PathBuf>,
    output_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct MarketSection {
    database_url: Option<String>,
    allowed_origin_suffix: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::with_defaults();
        assert_eq!(config.port.value, 80);
        assert_eq!(config.port.source, ConfigSource::Default);
        assert_eq!(config.output_prefix.value, "output-");
        assert_eq!(config.allowed_origin_suffix.value, "facebook.com");
        assert!(config.database_url.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[coverage]
signal_server_path = "/opt/signal/signalserverHD"
output_dir = "/srv/coverage"

[market]
database_url = "postgresql://localhost/gis"
"#
        )
        .unwrap();

        let config = ServiceConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.port.value, 8080);
        assert_eq!(config.port.source, ConfigSource::File);
        assert_eq!(config.signal_server_path.value, PathBuf::from("/opt/signal/signalserverHD"));
        assert_eq!(config.output_dir.value, PathBuf::from("/srv/coverage"));
        assert_eq!(config.database_url.value.as_deref(), Some("postgresql://localhost/gis"));
        // Untouched keys keep their defaults
        assert_eq!(config.sdf_dir.source, ConfigSource::Default);
        assert_eq!(config.convert_path.value, PathBuf::from("/usr/bin/convert"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"eighty\"").unwrap();

        let result = ServiceConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(TowercastError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_coverage_view() {
        let settings = ServiceConfig::with_defaults().coverage();
        assert_eq!(settings.sdf_dir, PathBuf::from("/home/ec2-user/efs"));
        assert_eq!(settings.output_prefix, "output-");
    }

    #[test]
    fn test_inspection_map_hides_database_url() {
        let mut config = ServiceConfig::with_defaults();
        config
            .database_url
            .update(Some("postgresql://user:secret@db/gis".to_string()), ConfigSource::File);

        let map = config.to_inspection_map();
        let (value, source) = &map["database_url"];
        assert_eq!(value, "set");
        assert_eq!(*source, ConfigSource::File);
        assert_eq!(map["port"].0, "80");
    }
}
