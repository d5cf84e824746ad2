use std::path::PathBuf;

use towercast_core::config::ServiceConfig;

/// HTTP-facing settings taken from the loaded [`ServiceConfig`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// Market routes echo `Origin` back only when it ends with this
    pub allowed_origin_suffix: String,
    /// Served under `/coverage-file/`
    pub output_dir: PathBuf,
}

impl ApiConfig {
    pub fn from_service(config: &ServiceConfig) -> Self {
        Self {
            port: config.port.value,
            allowed_origin_suffix: config.allowed_origin_suffix.value.clone(),
            output_dir: config.output_dir.value.clone(),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Whether a request `Origin` may read market responses
    pub fn origin_allowed(&self, origin: &str) -> bool {
        origin.ends_with(&self.allowed_origin_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_service_defaults() {
        let config = ApiConfig::from_service(&ServiceConfig::with_defaults());
        assert_eq!(config.bind_address(), "0.0.0.0:80");
        assert_eq!(config.output_dir, PathBuf::from("/home/ec2-user/output/"));
    }

    #[test]
    fn test_origin_suffix_match() {
        let config = ApiConfig::from_service(&ServiceConfig::with_defaults());
        assert!(config.origin_allowed("https://www.facebook.com"));
        assert!(config.origin_allowed("https://internalfb.facebook.com"));
        assert!(!config.origin_allowed("https://facebook.com.evil.example"));
        assert!(!config.origin_allowed(""));
    }
}
