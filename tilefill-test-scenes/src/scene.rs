use tilefill::{Color, Pixmap, WallpaperRenderer};

use crate::expectations::PixelExpectation;

/// Size of the frame every scenario renders into. Scenarios paint a target
/// that may be smaller, so the untouched remainder must stay transparent.
pub const CANVAS_WIDTH: u32 = 96;
pub const CANVAS_HEIGHT: u32 = 64;

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

/// A renderer setup, the target it paints, and the pixels it must produce.
pub struct Scenario {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Configures the renderer and returns the expectations for the frame.
    pub build: fn(&mut WallpaperRenderer) -> Vec<PixelExpectation>,
}

/// 2x2 red/blue checkerboard, red at the origin.
pub fn checkerboard_tile() -> Pixmap {
    Pixmap::from_fn(2, 2, |x, y| if (x + y) % 2 == 0 { RED } else { BLUE })
}

/// 7x5 tile with a distinct color per pixel.
fn gradient_tile() -> Pixmap {
    Pixmap::from_fn(7, 5, |x, y| Color::rgb(30 * x as u8, 40 * y as u8, 99))
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "checkerboard_5x5",
            width: 5,
            height: 5,
            build: checkerboard_5x5,
        },
        Scenario {
            name: "solid_black_without_tile",
            width: 10,
            height: 10,
            build: solid_black_without_tile,
        },
        Scenario {
            name: "half_alpha_red_over_white",
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            build: half_alpha_red_over_white,
        },
        Scenario {
            name: "transparent_tile_shows_background",
            width: 40,
            height: 40,
            build: transparent_tile_shows_background,
        },
        Scenario {
            name: "odd_tile_wraps_periodically",
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            build: odd_tile_wraps_periodically,
        },
    ]
}

fn checkerboard_5x5(renderer: &mut WallpaperRenderer) -> Vec<PixelExpectation> {
    renderer.set_tile(Some(checkerboard_tile()));
    renderer.set_background_color(Some(Color::WHITE));
    renderer.set_alpha(1.0);

    let mut expectations = Vec::new();
    for y in 0..5 {
        for x in 0..5 {
            let (r, b) = if (x + y) % 2 == 0 { (255, 0) } else { (0, 255) };
            expectations.push(PixelExpectation::opaque(x, y, r, 0, b, "checker_cell"));
        }
    }
    expectations.push(PixelExpectation::transparent(5, 0, "checker_right_of_target"));
    expectations.push(PixelExpectation::transparent(0, 5, "checker_below_target"));
    expectations
}

fn solid_black_without_tile(renderer: &mut WallpaperRenderer) -> Vec<PixelExpectation> {
    renderer.set_tile(None);
    renderer.set_background_color(Some(Color::BLACK));

    vec![
        PixelExpectation::opaque(0, 0, 0, 0, 0, "black_origin"),
        PixelExpectation::opaque(9, 9, 0, 0, 0, "black_last_pixel"),
        PixelExpectation::transparent(10, 9, "black_outside"),
    ]
}

fn half_alpha_red_over_white(renderer: &mut WallpaperRenderer) -> Vec<PixelExpectation> {
    renderer.set_tile(Some(Pixmap::filled(16, 16, RED)));
    renderer.set_background_color(None);
    renderer.set_alpha(0.5);

    vec![
        PixelExpectation::opaque(0, 0, 255, 128, 128, "blend_origin"),
        PixelExpectation::opaque(50, 33, 255, 128, 128, "blend_middle"),
        PixelExpectation::opaque(
            CANVAS_WIDTH - 1,
            CANVAS_HEIGHT - 1,
            255,
            128,
            128,
            "blend_corner",
        ),
    ]
}

fn transparent_tile_shows_background(renderer: &mut WallpaperRenderer) -> Vec<PixelExpectation> {
    renderer.set_tile(Some(Pixmap::new(4, 4)));
    renderer.set_background_color(Some(Color::rgb(12, 34, 56)));

    vec![
        PixelExpectation::opaque(0, 0, 12, 34, 56, "background_origin"),
        PixelExpectation::opaque(39, 39, 12, 34, 56, "background_corner"),
        PixelExpectation::transparent(40, 0, "background_outside"),
    ]
}

fn odd_tile_wraps_periodically(renderer: &mut WallpaperRenderer) -> Vec<PixelExpectation> {
    let tile = gradient_tile();
    renderer.set_tile(Some(tile.clone()));
    renderer.set_alpha(1.0);

    [(0, 0), (6, 4), (7, 5), (20, 13), (95, 63), (70, 41)]
        .into_iter()
        .map(|(x, y)| {
            let expected = tile.pixel(x % 7, y % 5).unwrap_or(Color::TRANSPARENT);
            PixelExpectation::new(x, y, expected, "gradient_wrap")
        })
        .collect()
}
