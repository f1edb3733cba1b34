use std::path::Path;

use crate::error::PixmapError;
use crate::{Color, Rect};

const BYTES_PER_PIXEL: usize = 4;

/// An owned RGBA8 raster, stored row-major and non-premultiplied.
///
/// `Pixmap` is the pixel container used for tiles, offscreen caches and the
/// software canvas.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Pixmap {
    /// Creates a fully transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Creates a pixmap where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * BYTES_PER_PIXEL);
        for _ in 0..pixel_count {
            data.extend_from_slice(&color.0);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Builds a pixmap by evaluating `pixel` at every coordinate.
    pub fn from_fn(width: u32, height: u32, mut pixel: impl FnMut(u32, u32) -> Color) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&pixel(x, y).0);
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps raw RGBA8 bytes. The buffer length must be `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixmapError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(PixmapError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decodes a PNG image from memory.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, PixmapError> {
        let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?;
        Ok(Self::from(decoded.to_rgba8()))
    }

    /// Reads and decodes a PNG file.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, PixmapError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| PixmapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode_png(&bytes)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Reads a pixel, or `None` when the coordinate is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        Some(Color(out))
    }

    /// Writes a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = self.offset(x, y);
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.0);
    }

    /// Copies out a sub-rectangle. Returns `None` if `rect` is not fully
    /// inside the pixmap or is empty.
    pub fn crop(&self, rect: Rect) -> Option<Pixmap> {
        if rect.is_empty() || rect.intersection(&self.bounds()) != rect {
            return None;
        }
        let mut cropped = Pixmap::new(rect.width, rect.height);
        cropped.copy_image(self, rect, 0, 0);
        Some(cropped)
    }

    /// Replaces every pixel inside `rect` with `color`.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_rect_clipped(rect, color, self.bounds());
    }

    /// Source-over composites `source` from `image` at `(dest_x, dest_y)`,
    /// scaling the source alpha by `alpha`.
    pub fn blend_image(
        &mut self,
        image: &Pixmap,
        source: Rect,
        dest_x: i32,
        dest_y: i32,
        alpha: f32,
    ) {
        self.blend_image_clipped(image, source, dest_x, dest_y, alpha, self.bounds());
    }

    /// Copies `source` from `image` to `(dest_x, dest_y)`, replacing the
    /// destination pixels.
    pub fn copy_image(&mut self, image: &Pixmap, source: Rect, dest_x: i32, dest_y: i32) {
        self.copy_image_clipped(image, source, dest_x, dest_y, self.bounds());
    }

    pub(crate) fn fill_rect_clipped(&mut self, rect: Rect, color: Color, clip: Rect) {
        let area = rect.intersection(&clip).intersection(&self.bounds());
        if area.is_empty() {
            return;
        }
        for y in area.y..area.y + area.height as i32 {
            let start = self.offset(area.x as u32, y as u32);
            let end = start + area.width as usize * BYTES_PER_PIXEL;
            for pixel in self.data[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&color.0);
            }
        }
    }

    pub(crate) fn blend_image_clipped(
        &mut self,
        image: &Pixmap,
        source: Rect,
        dest_x: i32,
        dest_y: i32,
        alpha: f32,
        clip: Rect,
    ) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some((src, dst)) = self.blit_regions(image, source, dest_x, dest_y, clip) else {
            return;
        };

        for row in 0..src.height {
            for column in 0..src.width {
                let (Some(src_px), Some(dst_px)) = (
                    image.pixel(src.x as u32 + column, src.y as u32 + row),
                    self.pixel(dst.x as u32 + column, dst.y as u32 + row),
                ) else {
                    continue;
                };
                self.set_pixel(
                    dst.x as u32 + column,
                    dst.y as u32 + row,
                    src_px.over(dst_px, alpha),
                );
            }
        }
    }

    pub(crate) fn copy_image_clipped(
        &mut self,
        image: &Pixmap,
        source: Rect,
        dest_x: i32,
        dest_y: i32,
        clip: Rect,
    ) {
        let Some((src, dst)) = self.blit_regions(image, source, dest_x, dest_y, clip) else {
            return;
        };

        let row_bytes = src.width as usize * BYTES_PER_PIXEL;
        for row in 0..src.height {
            let src_start = image.offset(src.x as u32, src.y as u32 + row);
            let dst_start = self.offset(dst.x as u32, dst.y as u32 + row);
            self.data[dst_start..dst_start + row_bytes]
                .copy_from_slice(&image.data[src_start..src_start + row_bytes]);
        }
    }

    /// Resolves the source and destination rectangles of a one-to-one blit
    /// after clipping against the source bounds, `clip`, and this pixmap.
    /// Both returned rectangles have the same size.
    fn blit_regions(
        &self,
        image: &Pixmap,
        source: Rect,
        dest_x: i32,
        dest_y: i32,
        clip: Rect,
    ) -> Option<(Rect, Rect)> {
        let cropped = source.intersection(&image.bounds());
        if cropped.is_empty() {
            return None;
        }
        let dest = Rect::new(
            dest_x.saturating_add(cropped.x - source.x),
            dest_y.saturating_add(cropped.y - source.y),
            cropped.width,
            cropped.height,
        );
        let visible = dest.intersection(&clip).intersection(&self.bounds());
        if visible.is_empty() {
            return None;
        }
        let src = visible.translate(cropped.x - dest.x, cropped.y - dest.y);
        Some((src, visible))
    }
}

impl From<image::RgbaImage> for Pixmap {
    fn from(value: image::RgbaImage) -> Self {
        let (width, height) = value.dimensions();
        Self {
            width,
            height,
            data: value.into_raw(),
        }
    }
}

impl From<Pixmap> for image::RgbaImage {
    fn from(value: Pixmap) -> Self {
        // Buffer length is an invariant of `Pixmap`, so this never falls back.
        image::RgbaImage::from_raw(value.width, value.height, value.data)
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::Pixmap;
    use crate::{Color, Rect};

    fn gradient(width: u32, height: u32) -> Pixmap {
        Pixmap::from_fn(width, height, |x, y| Color::rgb(x as u8 * 10, y as u8 * 10, 7))
    }

    #[test]
    fn from_rgba_rejects_wrong_length() {
        assert!(Pixmap::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(Pixmap::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn crop_returns_exact_pixels() {
        let pixmap = gradient(4, 4);
        let cropped = pixmap.crop(Rect::new(1, 2, 2, 2)).unwrap();
        assert_eq!(cropped.pixel(0, 0), Some(Color::rgb(10, 20, 7)));
        assert_eq!(cropped.pixel(1, 1), Some(Color::rgb(20, 30, 7)));
        assert!(pixmap.crop(Rect::new(3, 3, 2, 2)).is_none());
    }

    #[test]
    fn fill_rect_is_clipped_to_bounds() {
        let mut pixmap = Pixmap::filled(3, 3, Color::WHITE);
        pixmap.fill_rect(Rect::new(-1, -1, 3, 3), Color::BLACK);
        assert_eq!(pixmap.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(pixmap.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(pixmap.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(pixmap.pixel(2, 0), Some(Color::WHITE));
    }

    #[test]
    fn copy_image_with_negative_destination_crops_source() {
        let source = gradient(4, 4);
        let mut target = Pixmap::new(4, 4);
        target.copy_image(&source, source.bounds(), -1, -2);
        assert_eq!(target.pixel(0, 0), source.pixel(1, 2));
        assert_eq!(target.pixel(2, 1), source.pixel(3, 3));
        assert_eq!(target.pixel(3, 0), Some(Color::TRANSPARENT));
        assert_eq!(target.pixel(0, 2), Some(Color::TRANSPARENT));
    }

    #[test]
    fn blend_image_uses_alpha() {
        let red = Pixmap::filled(2, 2, Color::rgb(255, 0, 0));
        let mut target = Pixmap::filled(2, 2, Color::WHITE);
        target.blend_image(&red, red.bounds(), 0, 0, 0.5);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(target.pixel(x, y), Some(Color::rgb(255, 128, 128)));
            }
        }
    }

    #[test]
    fn png_round_trip_through_image_crate() {
        let pixmap = gradient(3, 2);
        let mut encoded = Vec::new();
        let rgba: image::RgbaImage = pixmap.clone().into();
        rgba.write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(Pixmap::decode_png(&encoded).unwrap(), pixmap);
    }
}
