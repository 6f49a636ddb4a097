// Typed handles into the texture cache

use std::fmt;
use std::marker::PhantomData;

/// Cache slot id, stable for as long as the entry is referenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Raw id for the renderer backend's own texture table
    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a cached asset.
///
/// Only the cache creates handles; `T` keeps texture handles apart from any
/// other asset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    id: AssetId,
    _kind: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _kind: PhantomData,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureAsset;

/// Sprite sheet, tileset or background image
pub type TextureHandle = AssetHandle<TextureAsset>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_compare_by_id() {
        let a: TextureHandle = AssetHandle::new(AssetId(3));
        let b: TextureHandle = AssetHandle::new(AssetId(3));
        let c: TextureHandle = AssetHandle::new(AssetId(4));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.id().index(), 4);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(AssetId(12).to_string(), "#12");
    }
}
