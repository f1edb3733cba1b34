use super::*;

use crate::tiling::TileGrid;

/// Direct path: background over the clip, then the tile source-over with
/// `alpha` at every visible repeat.
pub(super) fn draw_direct(
    canvas: &mut dyn Canvas,
    tile: &Pixmap,
    background: Color,
    alpha: f32,
    target: (u32, u32),
    clip: Rect,
) {
    canvas.fill_rect(clip, background);
    let Some(grid) = TileGrid::new(tile.size(), target) else {
        return;
    };
    for placement in grid.visible(clip) {
        canvas.draw_image(
            tile,
            placement.source,
            placement.dest.x,
            placement.dest.y,
            alpha,
        );
    }
}

/// Cached path: copies the pre-composited pattern over the clip.
pub(super) fn blit_tiled(
    canvas: &mut dyn Canvas,
    pattern: &Pixmap,
    target: (u32, u32),
    clip: Rect,
) {
    let Some(grid) = TileGrid::new(pattern.size(), target) else {
        return;
    };
    for placement in grid.visible(clip) {
        canvas.copy_image(pattern, placement.source, placement.dest.x, placement.dest.y);
    }
}
