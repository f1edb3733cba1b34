use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use ahash::RandomState;
use lru::LruCache;

use crate::config::DEFAULT_MIN_BLOCK_SIZE;
use crate::error::TileError;
use crate::{Pixmap, Tile};

const DEFAULT_CAPACITY: usize = 16;

/// Named, predefined wallpapers.
///
/// Tiles are decoded on first use from `<root>/<name>.png` and kept in a
/// bounded LRU cache. Each registry is an ordinary value owned by the
/// application context, so independent instances never share state.
pub struct WallpaperRegistry {
    root: Option<PathBuf>,
    min_block: (u32, u32),
    tiles: LruCache<String, Arc<Tile>, RandomState>,
}

impl std::fmt::Debug for WallpaperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallpaperRegistry")
            .field("root", &self.root)
            .field("min_block", &self.min_block)
            .field("cached", &self.tiles.len())
            .finish()
    }
}

impl Default for WallpaperRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl WallpaperRegistry {
    /// A registry that loads missing wallpapers from PNG files under `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::build(Some(root.into()))
    }

    /// A registry that only serves wallpapers added with [`insert`](Self::insert).
    pub fn in_memory() -> Self {
        Self::build(None)
    }

    fn build(root: Option<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            root,
            min_block: DEFAULT_MIN_BLOCK_SIZE,
            tiles: LruCache::with_hasher(capacity, RandomState::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.tiles.resize(capacity);
        self
    }

    pub fn with_min_block_size(mut self, width: u32, height: u32) -> Self {
        self.min_block = (width, height);
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tiles.contains(name)
    }

    /// Registers `image` under `name`, replacing any previous entry.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        image: Pixmap,
    ) -> Result<Arc<Tile>, TileError> {
        let tile = Arc::new(Tile::new(image, self.min_block)?);
        self.tiles.put(name.into(), tile.clone());
        Ok(tile)
    }

    /// Returns the wallpaper called `name`, loading it from disk on a miss.
    /// Only plain file names are looked up on disk; anything containing a
    /// path separator or `..` is unknown.
    pub fn get(&mut self, name: &str) -> Result<Arc<Tile>, TileError> {
        if let Some(tile) = self.tiles.get(name) {
            return Ok(tile.clone());
        }

        let Some(root) = self.root.as_ref().filter(|_| is_plain_name(name)) else {
            return Err(TileError::UnknownWallpaper(name.to_string()));
        };
        let path = root.join(format!("{name}.png"));
        if !path.is_file() {
            return Err(TileError::UnknownWallpaper(name.to_string()));
        }

        let image = Pixmap::load_png(&path)?;
        tracing::debug!("loaded predefined wallpaper {} from {}", name, path.display());
        self.insert(name, image)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Tile>> {
        self.tiles.pop(name)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

/// Whether `name` is a single file name that cannot leave the root.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::WallpaperRegistry;
    use crate::error::TileError;
    use crate::{Color, Pixmap};

    #[test]
    fn inserted_wallpaper_is_served_from_cache() {
        let mut registry = WallpaperRegistry::in_memory().with_min_block_size(4, 4);
        let inserted = registry
            .insert("dots", Pixmap::filled(2, 2, Color::BLACK))
            .unwrap();

        let fetched = registry.get("dots").unwrap();
        assert!(std::sync::Arc::ptr_eq(&inserted, &fetched));
        assert_eq!(fetched.size(), (4, 4));
    }

    #[test]
    fn missing_wallpaper_is_unknown() {
        let mut registry = WallpaperRegistry::in_memory();
        assert!(matches!(
            registry.get("nope"),
            Err(TileError::UnknownWallpaper(name)) if name == "nope"
        ));
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let mut registry =
            WallpaperRegistry::in_memory().with_capacity(NonZeroUsize::new(2).unwrap());
        registry.insert("a", Pixmap::filled(1, 1, Color::BLACK)).unwrap();
        registry.insert("b", Pixmap::filled(1, 1, Color::WHITE)).unwrap();
        registry.get("a").unwrap();
        registry.insert("c", Pixmap::filled(1, 1, Color::BLACK)).unwrap();

        assert!(registry.contains("a"));
        assert!(!registry.contains("b"));
        assert!(registry.contains("c"));
    }

    #[test]
    fn separate_registries_are_isolated() {
        let mut first = WallpaperRegistry::in_memory();
        let second = WallpaperRegistry::in_memory();
        first.insert("only-here", Pixmap::filled(1, 1, Color::BLACK)).unwrap();
        assert!(!second.contains("only-here"));
    }

    #[test]
    fn wallpaper_is_loaded_from_root() {
        let dir = std::env::temp_dir().join(format!("tilefill-registry-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let image: image::RgbaImage = Pixmap::filled(3, 3, Color::rgb(9, 8, 7)).into();
        image.save(dir.join("stone.png")).unwrap();

        let mut registry = WallpaperRegistry::with_root(&dir).with_min_block_size(1, 1);
        let tile = registry.get("stone").unwrap();
        assert_eq!(tile.size(), (3, 3));
        assert_eq!(tile.pixmap().pixel(1, 1), Some(Color::rgb(9, 8, 7)));
        assert!(registry.contains("stone"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn names_outside_root_are_unknown() {
        let dir = std::env::temp_dir().join(format!("tilefill-escape-{}", std::process::id()));
        let root = dir.join("wallpapers");
        std::fs::create_dir_all(root.join("nested")).unwrap();
        let image: image::RgbaImage = Pixmap::filled(2, 2, Color::BLACK).into();
        image.save(dir.join("outside.png")).unwrap();
        image.save(root.join("nested").join("inner.png")).unwrap();

        let mut registry = WallpaperRegistry::with_root(&root);
        for name in ["../outside", "nested/inner", "./nested", "", ".."] {
            assert!(
                matches!(registry.get(name), Err(TileError::UnknownWallpaper(_))),
                "{name:?} resolved outside the root"
            );
        }
        assert!(registry.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
