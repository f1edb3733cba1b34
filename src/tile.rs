use crate::error::TileError;
use crate::tiling::TileGrid;
use crate::{Pixmap, Rect};

/// The repeating source image of a wallpaper.
///
/// Small images are expanded once at construction by tiling them onto
/// themselves until each dimension reaches the minimum block size. This keeps
/// the number of blits per frame low for tiny patterns. The stored image is
/// always an exact periodic repetition of the source, so drawing the expanded
/// tile produces the same pixels as drawing the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pixmap: Pixmap,
    source_size: (u32, u32),
}

impl Tile {
    /// Builds a tile from `image`, expanding it up to `min_block`.
    pub fn new(image: Pixmap, min_block: (u32, u32)) -> Result<Self, TileError> {
        if image.is_empty() {
            return Err(TileError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }
        let source_size = image.size();
        Ok(Self {
            pixmap: expand_to_block(image, min_block),
            source_size,
        })
    }

    /// The expanded image that is actually drawn.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Size of the expanded image.
    pub fn size(&self) -> (u32, u32) {
        self.pixmap.size()
    }

    /// Size of the image the tile was built from.
    pub fn source_size(&self) -> (u32, u32) {
        self.source_size
    }

    pub fn is_expanded(&self) -> bool {
        self.pixmap.size() != self.source_size
    }
}

/// Smallest whole multiple of `size` that is at least `minimum`.
fn expanded_dimension(size: u32, minimum: u32) -> u32 {
    if size >= minimum {
        size
    } else {
        minimum.div_ceil(size).saturating_mul(size)
    }
}

/// Repeats `image` onto a larger pixmap so both dimensions reach `min_block`.
/// Images already at or above the block size are returned unchanged.
pub fn expand_to_block(image: Pixmap, min_block: (u32, u32)) -> Pixmap {
    let (width, height) = image.size();
    if width == 0 || height == 0 {
        return image;
    }
    let expanded_width = expanded_dimension(width, min_block.0);
    let expanded_height = expanded_dimension(height, min_block.1);
    if (expanded_width, expanded_height) == (width, height) {
        return image;
    }

    let mut expanded = Pixmap::new(expanded_width, expanded_height);
    if let Some(grid) = TileGrid::new((width, height), (expanded_width, expanded_height)) {
        for placement in grid.visible(Rect::from_size(expanded_width, expanded_height)) {
            expanded.copy_image(&image, placement.source, placement.dest.x, placement.dest.y);
        }
    }
    tracing::trace!(
        "expanded {}x{} tile to {}x{}",
        width,
        height,
        expanded_width,
        expanded_height
    );
    expanded
}
