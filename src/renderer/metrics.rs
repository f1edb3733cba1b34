/// Counters describing how the wallpaper cache has been used.
///
/// Counters only ever grow until [`reset_metrics`](super::WallpaperRenderer::reset_metrics).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetrics {
    /// Offscreen surfaces successfully allocated.
    pub allocations: u64,
    /// Times the cache contents were repainted.
    pub redraws: u64,
    /// Offscreen surfaces released.
    pub discards: u64,
    /// Allocations refused by the surface factory.
    pub allocation_failures: u64,
    /// Frames copied from the cache.
    pub cached_frames: u64,
    /// Frames drawn without the cache, including plain background fills.
    pub direct_frames: u64,
    /// Times the cache lost its contents and the frame was redrawn directly.
    pub content_lost: u64,
}

impl CacheMetrics {
    /// Merges another set of counters into this one.
    pub fn accumulate(&mut self, other: &Self) {
        self.allocations += other.allocations;
        self.redraws += other.redraws;
        self.discards += other.discards;
        self.allocation_failures += other.allocation_failures;
        self.cached_frames += other.cached_frames;
        self.direct_frames += other.direct_frames;
        self.content_lost += other.content_lost;
    }

    pub fn total_frames(&self) -> u64 {
        self.cached_frames + self.direct_frames
    }
}
