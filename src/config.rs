use std::path::PathBuf;

use crate::{Color, Pixmap};

/// Minimum tile block size tiles are expanded to.
pub const DEFAULT_MIN_BLOCK_SIZE: (u32, u32) = (128, 128);
/// Relative drift between the cache size and the ideal size that triggers
/// reallocation.
pub const DEFAULT_RESIZE_TOLERANCE: f32 = 0.2;
/// Upper bound of either cache dimension.
pub const DEFAULT_MAX_CACHE_DIMENSION: u32 = 2048;

/// Tuning parameters of a [`WallpaperRenderer`](crate::WallpaperRenderer).
///
/// None of these affect the rendered pixels, only how much work is spent
/// producing them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RendererConfig {
    pub min_block_size: (u32, u32),
    pub resize_tolerance: f32,
    pub max_cache_dimension: u32,
    pub cache_enabled: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            min_block_size: DEFAULT_MIN_BLOCK_SIZE,
            resize_tolerance: DEFAULT_RESIZE_TOLERANCE,
            max_cache_dimension: DEFAULT_MAX_CACHE_DIMENSION,
            cache_enabled: true,
        }
    }
}

impl RendererConfig {
    pub fn with_min_block_size(mut self, width: u32, height: u32) -> Self {
        self.min_block_size = (width, height);
        self
    }

    /// Negative or NaN tolerances are treated as zero.
    pub fn with_resize_tolerance(mut self, tolerance: f32) -> Self {
        self.resize_tolerance = if tolerance.is_nan() {
            0.0
        } else {
            tolerance.max(0.0)
        };
        self
    }

    pub fn with_max_cache_dimension(mut self, dimension: u32) -> Self {
        self.max_cache_dimension = dimension;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Brings values set directly on the fields or deserialized into range.
    ///
    /// Negative or NaN tolerances become zero and the minimum block size is
    /// capped at the maximum cache dimension.
    pub fn normalized(self) -> Self {
        let max = self.max_cache_dimension;
        Self {
            min_block_size: (self.min_block_size.0.min(max), self.min_block_size.1.min(max)),
            ..self.with_resize_tolerance(self.resize_tolerance)
        }
    }
}

/// Where the tile of a wallpaper comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WallpaperSource {
    /// Plain background color.
    #[default]
    None,
    /// A named wallpaper from a [`WallpaperRegistry`](crate::WallpaperRegistry).
    Predefined(String),
    /// A PNG file on disk.
    File(PathBuf),
    /// An image already in memory.
    Image(Pixmap),
}

/// A complete wallpaper description, as stored in user settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperSettings {
    pub source: WallpaperSource,
    /// `None` means the default white background.
    pub background: Option<Color>,
    pub alpha: f32,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            source: WallpaperSource::None,
            background: None,
            alpha: 1.0,
        }
    }
}

impl WallpaperSettings {
    pub fn new(source: WallpaperSource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}
