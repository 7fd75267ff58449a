use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_path: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    Memory,
}

impl PdfConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix
        let common = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(PdfConfig {
            common,
            storage: StorageConfig {
                backend: get_env("STORAGE_BACKEND", Some("local"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                // The directory documents live under; `pdfs` relative to the
                // working directory unless overridden.
                local_path: get_env("STORAGE_LOCAL_PATH", Some("pdfs"), is_prod)?,
            },
        })
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_known_values() {
        assert_eq!(StorageBackend::Local, "local".parse().unwrap());
        assert_eq!(StorageBackend::Memory, "Memory".parse().unwrap());
    }

    #[test]
    fn backend_rejects_unknown_values() {
        assert!("s3".parse::<StorageBackend>().is_err());
    }
}
