//! The wallpaper renderer: fills a viewport with a tiled image over a
//! background color, optionally through an offscreen cache of the pattern.

use std::sync::Arc;

use crate::canvas::Canvas;
use crate::config::{RendererConfig, WallpaperSettings, WallpaperSource};
use crate::error::TileError;
use crate::events::{ListenerId, Listeners, WallpaperEvent};
use crate::registry::WallpaperRegistry;
use crate::surface::{SoftwareSurfaceFactory, SurfaceFactory};
use crate::{Color, Pixmap, Rect, Tile};

mod cache;
mod metrics;
mod paint;

use cache::OffscreenCache;
pub use metrics::CacheMetrics;

/// Paints a tiled wallpaper.
///
/// The renderer owns the tile, background color and alpha, and keeps an
/// offscreen surface holding the composited pattern so that most frames are a
/// plain copy. The cache is purely an optimization: rendering with and without
/// it produces identical pixels, and any cache failure falls back to drawing
/// the tile directly.
///
/// All methods take `&mut self`; the renderer is meant to be driven from a
/// single UI thread.
pub struct WallpaperRenderer {
    config: RendererConfig,
    tile: Option<Arc<Tile>>,
    background: Color,
    alpha: f32,

    cache: Option<OffscreenCache>,
    /// Cache size the factory last refused. Not retried until the tile or
    /// the requested size changes.
    failed_allocation: Option<(u32, u32)>,
    surface_factory: Box<dyn SurfaceFactory>,

    listeners: Listeners,
    metrics: CacheMetrics,
}

impl std::fmt::Debug for WallpaperRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallpaperRenderer")
            .field("config", &self.config)
            .field("tile_size", &self.tile.as_ref().map(|tile| tile.size()))
            .field("background", &self.background)
            .field("alpha", &self.alpha)
            .field("cache_size", &self.cache_size())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Default for WallpaperRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WallpaperRenderer {
    /// A renderer with the default configuration and in-memory cache surfaces.
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    pub fn with_config(config: RendererConfig) -> Self {
        Self::with_surface_factory(config, SoftwareSurfaceFactory::default())
    }

    /// A renderer whose cache surfaces come from `surface_factory`.
    /// Out-of-range `config` values are normalized, see
    /// [`RendererConfig::normalized`].
    pub fn with_surface_factory(
        config: RendererConfig,
        surface_factory: impl SurfaceFactory + 'static,
    ) -> Self {
        Self {
            config: config.normalized(),
            tile: None,
            background: Color::WHITE,
            alpha: 1.0,
            cache: None,
            failed_allocation: None,
            surface_factory: Box::new(surface_factory),
            listeners: Listeners::default(),
            metrics: CacheMetrics::default(),
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn tile(&self) -> Option<&Arc<Tile>> {
        self.tile.as_ref()
    }

    pub fn background_color(&self) -> Color {
        self.background
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.metrics
    }

    pub fn reset_metrics(&mut self) {
        self.metrics = CacheMetrics::default();
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache_size(&self) -> Option<(u32, u32)> {
        self.cache.as_ref().map(|cache| cache.size())
    }

    /// Registers a listener for property changes.
    pub fn subscribe(&mut self, listener: impl FnMut(&WallpaperEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Replaces the tile with `image`, expanded to the configured minimum
    /// block size. `None` clears the tile. A zero-sized image clears the tile
    /// as well.
    pub fn set_tile(&mut self, image: Option<Pixmap>) {
        let tile = match image {
            None => None,
            Some(image) => match Tile::new(image, self.config.min_block_size) {
                Ok(tile) => Some(Arc::new(tile)),
                Err(error) => {
                    tracing::warn!("ignoring wallpaper tile: {}", error);
                    None
                }
            },
        };
        self.replace_tile(tile);
    }

    /// Replaces the tile with an already built one, e.g. from a
    /// [`WallpaperRegistry`].
    pub fn set_shared_tile(&mut self, tile: Option<Arc<Tile>>) {
        self.replace_tile(tile);
    }

    fn replace_tile(&mut self, tile: Option<Arc<Tile>>) {
        let unchanged = match (&self.tile, &tile) {
            (None, None) => true,
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            _ => false,
        };
        if unchanged {
            return;
        }

        self.dispose_cache();
        self.failed_allocation = None;
        let old = std::mem::replace(&mut self.tile, tile);
        let new = self.tile.clone();
        self.listeners.notify(&WallpaperEvent::TileChanged { old, new });
    }

    /// Sets the background color. `None` means white.
    pub fn set_background_color(&mut self, color: Option<Color>) {
        let color = color.unwrap_or(Color::WHITE);
        if color == self.background {
            return;
        }
        let old = std::mem::replace(&mut self.background, color);
        self.listeners.notify(&WallpaperEvent::BackgroundColorChanged { old, new: color });
    }

    /// Sets the opacity of the tile over the background, clamped to [0, 1].
    /// NaN is treated as fully opaque.
    pub fn set_alpha(&mut self, alpha: f32) {
        let alpha = if alpha.is_nan() {
            1.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        if alpha == self.alpha {
            return;
        }
        let old = std::mem::replace(&mut self.alpha, alpha);
        self.listeners.notify(&WallpaperEvent::AlphaChanged { old, new: alpha });
    }

    /// Applies a stored wallpaper description. The tile is resolved first, so
    /// on error the renderer is left untouched.
    pub fn apply_settings(
        &mut self,
        settings: &WallpaperSettings,
        registry: &mut WallpaperRegistry,
    ) -> Result<(), TileError> {
        let min_block = self.config.min_block_size;
        let tile = match &settings.source {
            WallpaperSource::None => None,
            WallpaperSource::Predefined(name) => Some(registry.get(name)?),
            WallpaperSource::File(path) => {
                Some(Arc::new(Tile::new(Pixmap::load_png(path)?, min_block)?))
            }
            WallpaperSource::Image(image) => Some(Arc::new(Tile::new(image.clone(), min_block)?)),
        };

        self.set_shared_tile(tile);
        self.set_background_color(settings.background);
        self.set_alpha(settings.alpha);
        Ok(())
    }

    /// Releases the offscreen cache. It is rebuilt on the next cached render.
    pub fn dispose_cache(&mut self) {
        if self.cache.take().is_some() {
            self.metrics.discards += 1;
            tracing::debug!("disposed wallpaper cache");
        }
    }

    /// Paints the wallpaper over `[0, width) x [0, height)`, limited to the
    /// canvas clip.
    ///
    /// With `allow_cache` the pattern is copied from the offscreen cache when
    /// one can be built; otherwise, or if the cache fails at any point, the
    /// background and tile are drawn directly.
    pub fn render(&mut self, canvas: &mut dyn Canvas, width: u32, height: u32, allow_cache: bool) {
        let clip = canvas
            .clip_bounds()
            .intersection(&Rect::from_size(width, height));
        if clip.is_empty() {
            return;
        }

        let Some(tile) = self.tile.clone() else {
            canvas.fill_rect(clip, self.background);
            self.metrics.direct_frames += 1;
            return;
        };

        if allow_cache
            && self.config.cache_enabled
            && self.render_cached(canvas, &tile, width, height, clip)
        {
            return;
        }

        tracing::trace!("drawing wallpaper directly over {:?}", clip);
        paint::draw_direct(
            canvas,
            tile.pixmap(),
            self.background,
            self.alpha,
            (width, height),
            clip,
        );
        self.metrics.direct_frames += 1;
    }

    /// Draws the frame from the cache. Returns `false` when nothing usable
    /// could be drawn and the caller must use the direct path.
    fn render_cached(
        &mut self,
        canvas: &mut dyn Canvas,
        tile: &Tile,
        width: u32,
        height: u32,
        clip: Rect,
    ) -> bool {
        if !self.prepare_cache(tile, width, height) {
            return false;
        }
        let Some(cache) = self.cache.as_ref() else {
            return false;
        };

        paint::blit_tiled(canvas, cache.pixmap(), (width, height), clip);

        if cache.contents_lost() {
            tracing::warn!("wallpaper cache lost its contents during blit, redrawing directly");
            self.metrics.content_lost += 1;
            self.dispose_cache();
            return false;
        }

        self.metrics.cached_frames += 1;
        true
    }
}

impl Drop for WallpaperRenderer {
    fn drop(&mut self) {
        self.dispose_cache();
    }
}
