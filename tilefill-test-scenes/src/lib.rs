pub mod expectations;
pub mod scene;
pub mod scripted;

pub use expectations::{check_pixels, PixelExpectation};
pub use scene::{checkerboard_tile, scenarios, Scenario, CANVAS_HEIGHT, CANVAS_WIDTH};
pub use scripted::{ScriptedSurfaceFactory, SurfaceScript};
