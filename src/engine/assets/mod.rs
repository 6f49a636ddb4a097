// Asset management system
//
// File access rooted at the asset directory and an explicit texture cache.
// Image decoding belongs to the renderer backend; here textures are interned
// by path and handed out as typed handles.

mod handle;
mod loader;
mod manager;

pub use handle::{AssetHandle, AssetId, TextureAsset, TextureHandle};
pub use loader::AssetLoader;
pub use manager::{CacheStats, TextureCache};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("levels/forest.json".to_string());
        assert_eq!(err.to_string(), "Asset not found: levels/forest.json");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AssetError = io.into();
        assert!(matches!(err, AssetError::Io(_)));
    }
}
