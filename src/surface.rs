//! Offscreen surfaces backing the wallpaper cache.
//!
//! An accelerated surface may silently lose its contents (device reset,
//! display mode change). Instead of hiding that behind the platform, every
//! surface reports its state through [`OffscreenSurface::validate`], which the
//! cache policy consumes before each use.

use crate::error::SurfaceError;
use crate::Pixmap;

/// Result of validating an offscreen surface before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// Contents are intact.
    Ok,
    /// The surface was restored but its contents are undefined and must be
    /// redrawn before use.
    RestoredNeedsRedraw,
    /// The surface can no longer be used with the current device and must be
    /// recreated.
    Incompatible,
}

/// A pixel surface that may live in platform-managed memory.
pub trait OffscreenSurface {
    fn size(&self) -> (u32, u32);

    /// Checks the surface against the current device. Called before every use.
    fn validate(&mut self) -> SurfaceStatus;

    /// Whether the contents were lost since the last [`validate`](Self::validate).
    fn contents_lost(&self) -> bool;

    /// Pixels to read when blitting the surface.
    fn pixmap(&self) -> &Pixmap;

    /// Pixels to write when repainting the surface.
    fn pixmap_mut(&mut self) -> &mut Pixmap;

    /// Pushes pending writes to the device.
    fn flush(&mut self) {}
}

/// Allocates offscreen surfaces compatible with the current device.
pub trait SurfaceFactory {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn OffscreenSurface>, SurfaceError>;
}

/// In-memory surface. Its contents are never lost.
#[derive(Debug)]
pub struct SoftwareSurface {
    pixmap: Pixmap,
}

impl SoftwareSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
        }
    }
}

impl OffscreenSurface for SoftwareSurface {
    fn size(&self) -> (u32, u32) {
        self.pixmap.size()
    }

    fn validate(&mut self) -> SurfaceStatus {
        SurfaceStatus::Ok
    }

    fn contents_lost(&self) -> bool {
        false
    }

    fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

/// Default number of pixels a software surface may hold (4096x4096).
pub const DEFAULT_SOFTWARE_PIXEL_BUDGET: u64 = 4096 * 4096;

/// Factory for [`SoftwareSurface`]s, refusing allocations above a pixel budget.
#[derive(Debug, Clone)]
pub struct SoftwareSurfaceFactory {
    pixel_budget: u64,
}

impl Default for SoftwareSurfaceFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SOFTWARE_PIXEL_BUDGET)
    }
}

impl SoftwareSurfaceFactory {
    pub fn new(pixel_budget: u64) -> Self {
        Self { pixel_budget }
    }

    pub fn pixel_budget(&self) -> u64 {
        self.pixel_budget
    }
}

impl SurfaceFactory for SoftwareSurfaceFactory {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn OffscreenSurface>, SurfaceError> {
        let pixels = width as u64 * height as u64;
        if pixels == 0 || pixels > self.pixel_budget {
            return Err(SurfaceError::AllocationFailed { width, height });
        }
        Ok(Box::new(SoftwareSurface::new(width, height)))
    }
}

#[cfg(test)]
mod tests {
    use super::{SoftwareSurfaceFactory, SurfaceFactory, SurfaceStatus};
    use crate::error::SurfaceError;

    #[test]
    fn software_surface_is_always_valid() {
        let mut factory = SoftwareSurfaceFactory::default();
        let mut surface = factory.create_surface(16, 8).unwrap();
        assert_eq!(surface.size(), (16, 8));
        assert_eq!(surface.validate(), SurfaceStatus::Ok);
        assert!(!surface.contents_lost());
    }

    #[test]
    fn allocation_above_budget_fails() {
        let mut factory = SoftwareSurfaceFactory::new(100);
        assert_eq!(
            factory.create_surface(20, 20).err(),
            Some(SurfaceError::AllocationFailed {
                width: 20,
                height: 20
            })
        );
        assert!(factory.create_surface(10, 10).is_ok());
    }
}
