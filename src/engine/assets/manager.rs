// Texture cache

use super::{AssetHandle, AssetId, TextureHandle};
use std::collections::HashMap;

#[derive(Debug)]
struct CacheEntry {
    id: AssetId,
    ref_count: u32,
}

/// Interns texture paths into handles.
///
/// Owned by the session and passed to the loaders that need textures; a level
/// or character acquires its textures on load and releases them when dropped
/// from the session. The renderer backend decodes the file behind a handle
/// when it first sees it.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, CacheEntry>,
    paths: HashMap<AssetId, String>,
    next_id: u64,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle for `path`, registering it on first use
    pub fn acquire(&mut self, path: &str) -> TextureHandle {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.ref_count += 1;
            return AssetHandle::new(entry.id);
        }

        let id = AssetId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            path.to_string(),
            CacheEntry {
                id,
                ref_count: 1,
            },
        );
        self.paths.insert(id, path.to_string());
        log::debug!("Texture registered: {} ({:?})", path, id);

        AssetHandle::new(id)
    }

    /// Drop one reference; the entry is evicted when none remain
    pub fn release(&mut self, handle: TextureHandle) {
        let Some(path) = self.paths.get(&handle.id()).cloned() else {
            return;
        };

        let evict = match self.entries.get_mut(&path) {
            Some(entry) => {
                entry.ref_count = entry.ref_count.saturating_sub(1);
                entry.ref_count == 0
            }
            None => false,
        };

        if evict {
            self.entries.remove(&path);
            self.paths.remove(&handle.id());
            log::debug!("Texture evicted: {}", path);
        }
    }

    /// Path a handle was acquired with
    pub fn path(&self, handle: TextureHandle) -> Option<&str> {
        self.paths.get(&handle.id()).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Drop every entry regardless of reference counts
    pub fn clear(&mut self) {
        self.entries.clear();
        self.paths.clear();
    }

    /// Get statistics about cached textures
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            texture_count: self.entries.len(),
            reference_count: self.entries.values().map(|e| e.ref_count as usize).sum(),
        }
    }
}

/// Statistics about cached textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub texture_count: usize,
    pub reference_count: usize,
}
