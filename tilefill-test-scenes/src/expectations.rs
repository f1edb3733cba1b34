use tilefill::{Color, Pixmap};

/// A single pixel-color expectation to validate after rendering.
pub struct PixelExpectation {
    pub x: u32,
    pub y: u32,
    pub expected: Color,
    /// Per-channel tolerance for comparison (default 0).
    pub tolerance: u8,
    /// Human-readable label for failure messages.
    pub label: &'static str,
}

impl PixelExpectation {
    pub fn new(x: u32, y: u32, expected: Color, label: &'static str) -> Self {
        Self {
            x,
            y,
            expected,
            tolerance: 0,
            label,
        }
    }

    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Convenience: expect a fully opaque color.
    pub fn opaque(x: u32, y: u32, r: u8, g: u8, b: u8, label: &'static str) -> Self {
        Self::new(x, y, Color::rgb(r, g, b), label)
    }

    /// Convenience: expect an untouched, fully transparent pixel.
    pub fn transparent(x: u32, y: u32, label: &'static str) -> Self {
        Self::new(x, y, Color::TRANSPARENT, label)
    }
}

/// Validates pixel expectations against a rendered frame.
///
/// Returns a list of human-readable failure descriptions. An empty list means
/// all expectations passed.
pub fn check_pixels(frame: &Pixmap, expectations: &[PixelExpectation]) -> Vec<String> {
    let mut failures = Vec::new();

    for expectation in expectations {
        let Some(actual) = frame.pixel(expectation.x, expectation.y) else {
            failures.push(format!(
                "[{}] pixel ({},{}) is outside frame {}x{}",
                expectation.label,
                expectation.x,
                expectation.y,
                frame.width(),
                frame.height(),
            ));
            continue;
        };

        let tolerance = expectation.tolerance as i16;
        let matches = actual
            .to_array()
            .iter()
            .zip(expectation.expected.to_array())
            .all(|(&actual, expected)| channel_matches(actual, expected, tolerance));

        if !matches {
            let [er, eg, eb, ea] = expectation.expected.to_array();
            let [ar, ag, ab, aa] = actual.to_array();
            failures.push(format!(
                "[{}] pixel ({},{}) expected rgba({},{},{},{}) ±{} but got rgba({},{},{},{})",
                expectation.label,
                expectation.x,
                expectation.y,
                er,
                eg,
                eb,
                ea,
                expectation.tolerance,
                ar,
                ag,
                ab,
                aa,
            ));
        }
    }

    failures
}

fn channel_matches(actual: u8, expected: u8, tolerance: i16) -> bool {
    let diff = (actual as i16) - (expected as i16);
    diff.abs() <= tolerance
}
