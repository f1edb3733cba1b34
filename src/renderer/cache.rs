use super::*;

use crate::canvas::PixmapCanvas;
use crate::surface::{OffscreenSurface, SurfaceStatus};

/// An offscreen surface holding the composited pattern, together with the
/// color and alpha it was painted with.
pub(super) struct OffscreenCache {
    surface: Box<dyn OffscreenSurface>,
    painted: Option<(Color, f32)>,
}

impl OffscreenCache {
    fn new(surface: Box<dyn OffscreenSurface>) -> Self {
        Self {
            surface,
            painted: None,
        }
    }

    pub(super) fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub(super) fn pixmap(&self) -> &Pixmap {
        self.surface.pixmap()
    }

    pub(super) fn contents_lost(&self) -> bool {
        self.surface.contents_lost()
    }

    fn needs_redraw(&self, background: Color, alpha: f32) -> bool {
        self.painted != Some((background, alpha))
    }

    fn mark_stale(&mut self) {
        self.painted = None;
    }

    /// Fills the whole surface with the background, then composites the
    /// tiled pattern over it.
    fn repaint(&mut self, tile: &Tile, background: Color, alpha: f32) {
        let pixmap = self.surface.pixmap_mut();
        let size = pixmap.size();
        let mut canvas = PixmapCanvas::new(pixmap);
        paint::draw_direct(
            &mut canvas,
            tile.pixmap(),
            background,
            alpha,
            size,
            Rect::from_size(size.0, size.1),
        );
        self.surface.flush();
        self.painted = Some((background, alpha));
    }
}

/// One cache dimension: a whole number of tile repeats covering `viewport`,
/// at least one repeat, and no more repeats than fit in `max`.
pub(super) fn ideal_dimension(viewport: u32, tile: u32, max: u32) -> u32 {
    let covering = viewport.div_ceil(tile).max(1).saturating_mul(tile);
    let limit = (max / tile).max(1).saturating_mul(tile);
    covering.min(limit)
}

pub(super) fn drifted(actual: u32, ideal: u32, tolerance: f32) -> bool {
    if ideal == 0 {
        return actual != 0;
    }
    (actual as f64 - ideal as f64).abs() / ideal as f64 > tolerance as f64
}

impl WallpaperRenderer {
    fn ideal_cache_size(&self, tile: &Tile, width: u32, height: u32) -> (u32, u32) {
        let (tile_width, tile_height) = tile.size();
        let max = self.config.max_cache_dimension;
        (
            ideal_dimension(width, tile_width, max),
            ideal_dimension(height, tile_height, max),
        )
    }

    /// Makes sure a painted cache for `tile` sized for the viewport exists.
    /// Returns `false` if no usable cache is available.
    pub(super) fn prepare_cache(&mut self, tile: &Tile, width: u32, height: u32) -> bool {
        let ideal = self.ideal_cache_size(tile, width, height);
        if self.cache.is_none() && self.failed_allocation == Some(ideal) {
            return false;
        }

        let tolerance = self.config.resize_tolerance;
        let mut reallocate = match self.cache.as_mut() {
            None => true,
            Some(cache) => match cache.surface.validate() {
                SurfaceStatus::Incompatible => {
                    tracing::debug!("wallpaper cache is incompatible with the device");
                    true
                }
                SurfaceStatus::RestoredNeedsRedraw => {
                    tracing::debug!("wallpaper cache was restored, repainting");
                    cache.mark_stale();
                    false
                }
                SurfaceStatus::Ok => false,
            },
        };
        if let Some(cache) = self.cache.as_ref().filter(|_| !reallocate) {
            let (cache_width, cache_height) = cache.size();
            if drifted(cache_width, ideal.0, tolerance)
                || drifted(cache_height, ideal.1, tolerance)
            {
                tracing::debug!(
                    "wallpaper cache {}x{} drifted from {}x{}",
                    cache_width,
                    cache_height,
                    ideal.0,
                    ideal.1
                );
                reallocate = true;
            }
        }

        if reallocate {
            self.dispose_cache();
            match self.surface_factory.create_surface(ideal.0, ideal.1) {
                Ok(surface) => {
                    tracing::debug!("allocated {}x{} wallpaper cache", ideal.0, ideal.1);
                    self.metrics.allocations += 1;
                    self.failed_allocation = None;
                    self.cache = Some(OffscreenCache::new(surface));
                }
                Err(error) => {
                    tracing::debug!("wallpaper cache unavailable, drawing directly: {}", error);
                    self.metrics.allocation_failures += 1;
                    self.failed_allocation = Some(ideal);
                    return false;
                }
            }
        }

        let (background, alpha) = (self.background, self.alpha);
        let Some(cache) = self.cache.as_mut() else {
            return false;
        };
        if cache.needs_redraw(background, alpha) {
            cache.repaint(tile, background, alpha);
            self.metrics.redraws += 1;
        }

        if cache.contents_lost() {
            tracing::debug!("wallpaper cache lost its contents while painting");
            self.metrics.content_lost += 1;
            self.dispose_cache();
            return false;
        }
        true
    }
}
