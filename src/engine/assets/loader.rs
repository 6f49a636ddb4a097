// Asset file access

use super::AssetError;
use std::path::{Path, PathBuf};

/// Resolves asset names against the asset root and reads them
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset; absolute names are kept as they are
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Read a text asset (JSON manifests, CSV layers)
    pub fn read_to_string(&self, name: &str) -> Result<String, AssetError> {
        let path = self.resolve_path(name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }

        std::fs::read_to_string(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", path.display(), e)))
    }

    /// Check if an asset exists
    pub fn exists(&self, name: &str) -> bool {
        self.resolve_path(name).exists()
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.resolve_path("levels/forest.json");

        assert_eq!(path, PathBuf::from("/game/assets/levels/forest.json"));
    }

    #[test]
    fn test_absolute_path_kept() {
        let loader = AssetLoader::new("/game/assets");
        assert_eq!(loader.resolve_path("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_read_to_string() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("layer.csv"), "0,1,-1\n").unwrap();

        let loader = AssetLoader::new(dir.path());
        assert!(loader.exists("layer.csv"));
        assert_eq!(loader.read_to_string("layer.csv").unwrap(), "0,1,-1\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let loader = AssetLoader::new(dir.path());

        let err = loader.read_to_string("missing.json").unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }
}
