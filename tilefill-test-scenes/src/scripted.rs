//! A fake offscreen device whose behavior is scripted by the test.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tilefill::{Color, OffscreenSurface, Pixmap, SurfaceError, SurfaceFactory, SurfaceStatus};

/// Color written into a surface whose contents become undefined.
pub const GARBAGE: Color = Color::rgb(255, 0, 255);

/// Shared, mutable description of how the fake device behaves.
#[derive(Debug, Default)]
pub struct SurfaceScript {
    /// Refuse every allocation while set.
    pub refuse_allocations: bool,
    /// Statuses returned by the next `validate` calls, in order. `Ok` once
    /// drained.
    pub pending_statuses: VecDeque<SurfaceStatus>,
    /// Number of `contents_lost` checks that pass before one reports a loss.
    pub lose_contents_after_checks: Option<u32>,
    /// Sizes of all surfaces handed out.
    pub created: Vec<(u32, u32)>,
    pub validations: u32,
}

/// [`SurfaceFactory`] backed by a [`SurfaceScript`].
#[derive(Clone, Default)]
pub struct ScriptedSurfaceFactory {
    script: Rc<RefCell<SurfaceScript>>,
}

impl ScriptedSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to steer the device after the factory was moved into a renderer.
    pub fn script(&self) -> Rc<RefCell<SurfaceScript>> {
        self.script.clone()
    }
}

impl SurfaceFactory for ScriptedSurfaceFactory {
    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn OffscreenSurface>, SurfaceError> {
        let mut script = self.script.borrow_mut();
        if script.refuse_allocations {
            return Err(SurfaceError::AllocationFailed { width, height });
        }
        script.created.push((width, height));
        Ok(Box::new(ScriptedSurface {
            pixmap: Pixmap::filled(width, height, GARBAGE),
            script: self.script.clone(),
        }))
    }
}

struct ScriptedSurface {
    pixmap: Pixmap,
    script: Rc<RefCell<SurfaceScript>>,
}

impl OffscreenSurface for ScriptedSurface {
    fn size(&self) -> (u32, u32) {
        self.pixmap.size()
    }

    fn validate(&mut self) -> SurfaceStatus {
        let mut script = self.script.borrow_mut();
        script.validations += 1;
        let status = script
            .pending_statuses
            .pop_front()
            .unwrap_or(SurfaceStatus::Ok);
        if status != SurfaceStatus::Ok {
            let bounds = self.pixmap.bounds();
            self.pixmap.fill_rect(bounds, GARBAGE);
        }
        status
    }

    fn contents_lost(&self) -> bool {
        let mut script = self.script.borrow_mut();
        match script.lose_contents_after_checks {
            Some(0) => {
                script.lose_contents_after_checks = None;
                true
            }
            Some(remaining) => {
                script.lose_contents_after_checks = Some(remaining - 1);
                false
            }
            None => false,
        }
    }

    fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}
