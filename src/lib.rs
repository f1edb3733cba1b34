//! Tiled wallpaper rendering with an offscreen pattern cache.
//!
//! ```
//! use tilefill::{Color, Pixmap, PixmapCanvas, WallpaperRenderer};
//!
//! let mut renderer = WallpaperRenderer::new();
//! renderer.set_tile(Some(Pixmap::filled(16, 16, Color::rgb(200, 40, 40))));
//! renderer.set_alpha(0.5);
//!
//! let mut frame = Pixmap::new(320, 240);
//! renderer.render(&mut PixmapCanvas::new(&mut frame), 320, 240, true);
//! assert_eq!(frame.pixel(10, 10), Some(Color::rgb(228, 148, 148)));
//! ```

mod canvas;
mod color;
mod config;
mod error;
mod events;
mod pixmap;
mod rect;
mod registry;
mod renderer;
mod surface;
mod tile;
pub mod tiling;

pub use canvas::{Canvas, PixmapCanvas};
pub use color::Color;
pub use config::{
    RendererConfig, WallpaperSettings, WallpaperSource, DEFAULT_MAX_CACHE_DIMENSION,
    DEFAULT_MIN_BLOCK_SIZE, DEFAULT_RESIZE_TOLERANCE,
};
pub use error::{PixmapError, SurfaceError, TileError};
pub use events::{ListenerId, Listeners, WallpaperEvent};
pub use pixmap::Pixmap;
pub use rect::Rect;
pub use registry::WallpaperRegistry;
pub use renderer::{CacheMetrics, WallpaperRenderer};
pub use surface::{
    OffscreenSurface, SoftwareSurface, SoftwareSurfaceFactory, SurfaceFactory, SurfaceStatus,
    DEFAULT_SOFTWARE_PIXEL_BUDGET,
};
pub use tile::{expand_to_block, Tile};
