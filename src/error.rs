use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when constructing or decoding a [`Pixmap`](crate::Pixmap).
#[derive(Debug, Error)]
pub enum PixmapError {
    #[error("{actual} byte buffer does not match {width}x{height} RGBA8 ({expected} bytes)")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors raised when building a [`Tile`](crate::Tile) or resolving one from
/// a [`WallpaperRegistry`](crate::WallpaperRegistry).
#[derive(Debug, Error)]
pub enum TileError {
    #[error("tile image must have a non-zero size, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("unknown predefined wallpaper `{0}`")]
    UnknownWallpaper(String),
    #[error(transparent)]
    Pixmap(#[from] PixmapError),
}

/// Errors reported by a [`SurfaceFactory`](crate::SurfaceFactory).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("offscreen surface of {width}x{height} could not be allocated")]
    AllocationFailed { width: u32, height: u32 },
}
