//! The tiling algorithm shared by every draw path.
//!
//! A source of `tile_width x tile_height` pixels is repeated from the origin
//! to cover a `width x height` target: `ceil(width / tile_width)` columns by
//! `ceil(height / tile_height)` rows, each repeat a one-to-one blit at
//! `(column * tile_width, row * tile_height)`. Only repeats intersecting the
//! clip are visited; their column and row ranges are computed from the clip
//! directly.

use crate::Rect;

/// One visible repeat of the source, cropped to the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub column: u32,
    pub row: u32,
    /// Region of the source image to draw.
    pub source: Rect,
    /// Region of the target covered by `source`. Same size as `source`.
    pub dest: Rect,
}

/// A grid of source repeats covering a target rectangle anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    tile_width: u32,
    tile_height: u32,
    width: u32,
    height: u32,
    columns: u32,
    rows: u32,
}

impl TileGrid {
    /// Returns `None` if the tile has a zero dimension.
    pub fn new(tile_size: (u32, u32), target_size: (u32, u32)) -> Option<Self> {
        let (tile_width, tile_height) = tile_size;
        if tile_width == 0 || tile_height == 0 {
            return None;
        }
        let (width, height) = target_size;
        Some(Self {
            tile_width,
            tile_height,
            width,
            height,
            columns: width.div_ceil(tile_width),
            rows: height.div_ceil(tile_height),
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of repeats needed to cover the whole target, before clipping.
    pub fn repeat_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    pub fn target(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Full, unclipped rectangle of the repeat at `(column, row)`.
    pub fn cell(&self, column: u32, row: u32) -> Rect {
        Rect::new(
            (column as i64 * self.tile_width as i64).min(i32::MAX as i64) as i32,
            (row as i64 * self.tile_height as i64).min(i32::MAX as i64) as i32,
            self.tile_width,
            self.tile_height,
        )
    }

    /// Iterates the repeats intersecting `clip`, cropped to `clip` and the
    /// target. Every pixel of `clip ∩ target` is covered by exactly one
    /// placement.
    pub fn visible(&self, clip: Rect) -> VisibleTiles {
        let area = clip.intersection(&self.target());
        if area.is_empty() {
            return VisibleTiles::empty(*self, area);
        }

        let tile_width = self.tile_width as i64;
        let tile_height = self.tile_height as i64;
        let first_column = (area.x as i64 / tile_width) as u32;
        let first_row = (area.y as i64 / tile_height) as u32;
        let end_column =
            ((area.right() + tile_width - 1) / tile_width).min(self.columns as i64) as u32;
        let end_row =
            ((area.bottom() + tile_height - 1) / tile_height).min(self.rows as i64) as u32;

        VisibleTiles {
            grid: *self,
            area,
            first_column,
            end_column,
            end_row,
            column: first_column,
            row: first_row,
        }
    }
}

/// Iterator returned by [`TileGrid::visible`].
#[derive(Debug, Clone)]
pub struct VisibleTiles {
    grid: TileGrid,
    area: Rect,
    first_column: u32,
    end_column: u32,
    end_row: u32,
    column: u32,
    row: u32,
}

impl VisibleTiles {
    fn empty(grid: TileGrid, area: Rect) -> Self {
        Self {
            grid,
            area,
            first_column: 0,
            end_column: 0,
            end_row: 0,
            column: 0,
            row: 0,
        }
    }
}

impl Iterator for VisibleTiles {
    type Item = TilePlacement;

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.end_row {
            if self.column >= self.end_column {
                self.column = self.first_column;
                self.row += 1;
                continue;
            }

            let (column, row) = (self.column, self.row);
            self.column += 1;

            let cell = self.grid.cell(column, row);
            let dest = cell.intersection(&self.area);
            if dest.is_empty() {
                continue;
            }
            let source = dest.translate(-cell.x, -cell.y);
            return Some(TilePlacement {
                column,
                row,
                source,
                dest,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::TileGrid;
    use crate::Rect;

    #[test]
    fn repeat_count_rounds_up() {
        let grid = TileGrid::new((2, 2), (5, 5)).unwrap();
        assert_eq!((grid.columns(), grid.rows()), (3, 3));
        assert_eq!(grid.repeat_count(), 9);

        let exact = TileGrid::new((4, 3), (8, 9)).unwrap();
        assert_eq!(exact.repeat_count(), 6);
    }

    #[test]
    fn zero_tile_is_rejected() {
        assert!(TileGrid::new((0, 4), (8, 8)).is_none());
    }

    #[test]
    fn full_clip_visits_every_repeat() {
        let grid = TileGrid::new((2, 2), (5, 5)).unwrap();
        let placements: Vec<_> = grid.visible(grid.target()).collect();
        assert_eq!(placements.len() as u64, grid.repeat_count());

        let last = placements.last().unwrap();
        assert_eq!((last.column, last.row), (2, 2));
        assert_eq!(last.dest, Rect::new(4, 4, 1, 1));
        assert_eq!(last.source, Rect::new(0, 0, 1, 1));
    }

    #[test]
    fn clip_skips_repeats_outside() {
        let grid = TileGrid::new((10, 10), (100, 100)).unwrap();
        let placements: Vec<_> = grid.visible(Rect::new(15, 25, 10, 10)).collect();

        let cells: Vec<_> = placements.iter().map(|p| (p.column, p.row)).collect();
        assert_eq!(cells, vec![(1, 2), (2, 2), (1, 3), (2, 3)]);
        assert_eq!(placements[0].source, Rect::new(5, 5, 5, 5));
        assert_eq!(placements[0].dest, Rect::new(15, 25, 5, 5));
    }

    #[test]
    fn every_pixel_is_covered_exactly_once() {
        for &(tile, target, clip) in &[
            ((3, 2), (10, 7), Rect::from_size(10, 7)),
            ((4, 4), (9, 9), Rect::new(1, 3, 7, 5)),
            ((7, 5), (7, 5), Rect::new(-3, -3, 20, 20)),
        ] {
            let grid = TileGrid::new(tile, target).unwrap();
            let mut hits = vec![0u32; (target.0 * target.1) as usize];
            for placement in grid.visible(clip) {
                assert_eq!(placement.source.width, placement.dest.width);
                assert_eq!(placement.source.height, placement.dest.height);
                for y in placement.dest.y..placement.dest.bottom() as i32 {
                    for x in placement.dest.x..placement.dest.right() as i32 {
                        hits[(y as u32 * target.0 + x as u32) as usize] += 1;
                    }
                }
            }

            let area = clip.intersection(&grid.target());
            for y in 0..target.1 {
                for x in 0..target.0 {
                    let expected = u32::from(area.contains(x as i32, y as i32));
                    assert_eq!(hits[(y * target.0 + x) as usize], expected, "pixel ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn clip_outside_target_yields_nothing() {
        let grid = TileGrid::new((4, 4), (8, 8)).unwrap();
        assert_eq!(grid.visible(Rect::new(20, 20, 5, 5)).count(), 0);
    }
}
