//! Fetching and caching of model package files.
//!
//! A model package is a single self-contained file: the computation graph
//! plus optional embedded metadata and bundled label files. The manager
//! only moves bytes around; handing them to an engine is the
//! [`EngineLoader`](crate::engine::EngineLoader)'s job.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Package not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Package verification failed")]
    VerificationFailed,
    #[error("Hash mismatch for package {name}: expected {expected}, got {actual}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// Where a model package lives and what its contents must hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub url: String,
    pub sha256: String,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            sha256: sha256.into(),
        }
    }
}

#[derive(Clone)]
pub struct ModelManager {
    packages_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default packages directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::default_packages_dir())
    }

    /// Returns the default packages directory path
    pub fn default_packages_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("WERNICKE_CACHE") {
            return PathBuf::from(path).join("packages");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("wernicke").join("packages");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("wernicke").join("packages");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("wernicke").join("packages")
    }

    pub fn new<P: AsRef<Path>>(packages_dir: P) -> io::Result<Self> {
        let packages_dir = packages_dir.as_ref().to_path_buf();
        fs::create_dir_all(&packages_dir)?;
        Ok(Self {
            packages_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn package_path(&self, info: &PackageInfo) -> PathBuf {
        self.packages_dir.join(&info.name).join("model.bin")
    }

    pub fn is_downloaded(&self, info: &PackageInfo) -> bool {
        let path = self.package_path(info);
        log::info!("Checking package {:?} at {:?} (exists: {})", info.name, path, path.exists());
        path.exists()
    }

    /// Reads the package bytes, ready to feed to an engine loader as
    /// `ModelSource::Buffer`.
    pub fn read_bytes(&self, info: &PackageInfo) -> Result<Vec<u8>, ModelError> {
        let path = self.package_path(info);
        if !path.exists() {
            return Err(ModelError::NotDownloaded(info.name.clone()));
        }
        Ok(fs::read(path)?)
    }

    pub async fn download(&self, info: &PackageInfo) -> Result<(), ModelError> {
        let _lock = self.download_lock.lock().await;

        let path = self.package_path(info);
        if path.exists() {
            log::info!("Package file exists at {:?}, verifying...", path);
            if self.verify_file(&path, &info.sha256)? {
                log::info!("Existing package verified successfully");
                return Ok(());
            }
            log::warn!("Package verification failed, redownloading");
        }

        let result = self.download_and_verify(info, &path).await;
        if let Err(ref err) = result {
            log::error!("Failed to set up package {:?}: {}", info.name, err);
            // Cleanup on failure
            let _ = self.remove(info);
        }
        result
    }

    pub fn verify(&self, info: &PackageInfo) -> Result<bool, ModelError> {
        let path = self.package_path(info);
        if !path.exists() {
            log::info!("Package file does not exist");
            return Ok(false);
        }
        self.verify_file(&path, &info.sha256)
    }

    pub fn remove(&self, info: &PackageInfo) -> Result<(), ModelError> {
        let path = self.package_path(info);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Ensures that a package is downloaded and verified.
    /// If the package doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_downloaded(&self, info: &PackageInfo) -> Result<(), ModelError> {
        log::info!("Checking if package {:?} is downloaded...", info.name);
        if !self.is_downloaded(info) {
            log::info!("Package not found, downloading...");
            self.download(info).await?;
        } else if !self.verify(info)? {
            log::info!("Package verification failed, re-downloading...");
            self.remove(info)?;
            self.download(info).await?;
        } else {
            log::info!("Package verification successful");
        }
        Ok(())
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
        let bytes = fs::read(path)?;
        let hash = sha256_hex(&bytes);
        log::info!("Calculated hash: {}", hash);
        log::info!("Expected hash:   {}", expected_hash);
        Ok(hash == expected_hash)
    }

    async fn download_and_verify(&self, info: &PackageInfo, path: &Path) -> Result<(), ModelError> {
        log::info!("Downloading package {:?} from {} to {:?}", info.name, info.url, path);
        let response = reqwest::get(&info.url).await?;
        log::info!("Download response status: {}", response.status());
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let hash = sha256_hex(&bytes);
        if hash != info.sha256 {
            log::error!(
                "Package hash mismatch: expected {}, got {}",
                info.sha256,
                hash
            );
            return Err(ModelError::HashMismatch {
                name: info.name.clone(),
                expected: info.sha256.clone(),
                actual: hash,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;

        // Verify after writing
        if !self.verify_file(path, &info.sha256)? {
            return Err(ModelError::VerificationFailed);
        }

        log::info!("Package downloaded and verified successfully");
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_packages_dir() {
        // Test with environment variable
        env::set_var("WERNICKE_CACHE", "/tmp/test-wernicke-cache");
        let path = ModelManager::default_packages_dir();
        assert!(path
            .to_str()
            .unwrap()
            .contains("/tmp/test-wernicke-cache/packages"));
        env::remove_var("WERNICKE_CACHE");

        // Test without environment variable
        let path = ModelManager::default_packages_dir();
        assert!(path.to_str().unwrap().contains("wernicke"));
    }

    #[test]
    fn test_verify_roundtrip() -> Result<(), ModelError> {
        let dir = env::temp_dir().join("wernicke-test-verify");
        let manager = ModelManager::new(&dir)?;
        let bytes = b"not a real model".to_vec();
        let info = PackageInfo::new("tiny", "http://localhost/unused", sha256_hex(&bytes));

        let path = manager.package_path(&info);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, &bytes)?;

        assert!(manager.is_downloaded(&info));
        assert!(manager.verify(&info)?);
        assert_eq!(manager.read_bytes(&info)?, bytes);

        fs::write(&path, b"corrupted data")?;
        assert!(!manager.verify(&info)?);

        manager.remove(&info)?;
        assert!(!manager.is_downloaded(&info));
        assert!(matches!(
            manager.read_bytes(&info),
            Err(ModelError::NotDownloaded(_))
        ));
        Ok(())
    }
}
