use async_trait::async_trait;
use dashmap::DashMap;
use service_core::error::AppError;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError>;
}

/// Files under a configured root directory. Disk is the sole source of truth;
/// nothing is cached between requests.
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await.map_err(|e| {
                AppError::StorageError(anyhow::anyhow!(
                    "Failed to create storage root {}: {}",
                    base_path.display(),
                    e
                ))
            })?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.base_path.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::StorageError(anyhow::anyhow!("Failed to create directory: {}", e))
            })?;
        }
        fs::write(&path, data).await.map_err(|e| {
            AppError::StorageError(anyhow::anyhow!("Failed to write {}: {}", key, e))
        })?;
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.base_path.join(key);
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(AppError::NotFound(anyhow::anyhow!(
                "No document stored at {}",
                key
            ))),
            Err(e) => Err(AppError::StorageError(anyhow::anyhow!(
                "Failed to read {}: {}",
                key,
                e
            ))),
        }
    }
}

/// In-memory backend for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No document stored at {}", key)))
    }
}
