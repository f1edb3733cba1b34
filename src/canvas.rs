use crate::{Color, Pixmap, Rect};

/// The immediate-mode 2D drawing surface a wallpaper is painted onto.
///
/// All operations are one-to-one pixel blits; nothing is scaled. Drawing
/// outside [`Canvas::clip_bounds`] has no effect.
pub trait Canvas {
    /// The region that drawing operations may touch.
    fn clip_bounds(&self) -> Rect;

    /// Replaces every pixel of `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Source-over composites the `source` region of `image` at
    /// `(dest_x, dest_y)` with the source alpha scaled by `alpha`.
    fn draw_image(&mut self, image: &Pixmap, source: Rect, dest_x: i32, dest_y: i32, alpha: f32);

    /// Copies the `source` region of `image` to `(dest_x, dest_y)`,
    /// replacing the destination pixels.
    fn copy_image(&mut self, image: &Pixmap, source: Rect, dest_x: i32, dest_y: i32);
}

/// Software [`Canvas`] drawing into a borrowed [`Pixmap`].
pub struct PixmapCanvas<'a> {
    pixmap: &'a mut Pixmap,
    clip: Rect,
}

impl<'a> PixmapCanvas<'a> {
    pub fn new(pixmap: &'a mut Pixmap) -> Self {
        let clip = pixmap.bounds();
        Self { pixmap, clip }
    }

    /// Restricts drawing to `clip` (intersected with the pixmap bounds).
    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.set_clip(clip);
        self
    }

    pub fn set_clip(&mut self, clip: Rect) {
        self.clip = clip.intersection(&self.pixmap.bounds());
    }

    pub fn pixmap(&self) -> &Pixmap {
        self.pixmap
    }
}

impl Canvas for PixmapCanvas<'_> {
    fn clip_bounds(&self) -> Rect {
        self.clip
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.pixmap.fill_rect_clipped(rect, color, self.clip);
    }

    fn draw_image(&mut self, image: &Pixmap, source: Rect, dest_x: i32, dest_y: i32, alpha: f32) {
        self.pixmap
            .blend_image_clipped(image, source, dest_x, dest_y, alpha, self.clip);
    }

    fn copy_image(&mut self, image: &Pixmap, source: Rect, dest_x: i32, dest_y: i32) {
        self.pixmap
            .copy_image_clipped(image, source, dest_x, dest_y, self.clip);
    }
}
