/// Represents a color in RGBA format.
///
/// Each channel is an 8-bit unsigned integer. Colors are stored
/// non-premultiplied.
///
/// # Examples
///
/// ```
/// use tilefill::Color;
///
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.normalize(), [1.0, 0.0, 0.0, 1.0]);
///
/// let semi_blue = Color::rgba(0, 0, 255, 128);
/// assert_eq!(semi_blue.to_array(), [0, 0, 255, 128]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub [u8; 4]);

impl Color {
    /// All channels zero.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// Opaque black.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// Opaque white. This is the default background of a wallpaper.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates a new color with the specified RGB values and full opacity.
    ///
    /// ```
    /// use tilefill::Color;
    ///
    /// let green = Color::rgb(0, 255, 0);
    /// assert_eq!(green, Color([0, 255, 0, 255]));
    /// ```
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Creates a new color with the specified RGBA values.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    pub fn a(&self) -> u8 {
        self.0[3]
    }

    pub fn is_opaque(&self) -> bool {
        self.0[3] == 255
    }

    /// Normalizes the color values to the range [0.0, 1.0].
    pub fn normalize(&self) -> [f32; 4] {
        [
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
            self.0[3] as f32 / 255.0,
        ]
    }

    /// Returns the color as an array of 4 `u8` values.
    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    /// Composites `self` over `dst` with an extra opacity factor, using
    /// non-premultiplied source-over in linear (unconverted) channel space.
    ///
    /// ```
    /// use tilefill::Color;
    ///
    /// let blended = Color::rgb(255, 0, 0).over(Color::WHITE, 0.5);
    /// assert_eq!(blended, Color::rgb(255, 128, 128));
    /// ```
    pub fn over(self, dst: Color, opacity: f32) -> Color {
        let src_a = self.0[3] as f32 / 255.0 * opacity.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return dst;
        }
        if src_a >= 1.0 {
            return self;
        }

        let dst_a = dst.0[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mut out = [0u8; 4];
        for (channel, slot) in out.iter_mut().enumerate().take(3) {
            let src_c = self.0[channel] as f32;
            let dst_c = dst.0[channel] as f32;
            let value = (src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
            *slot = value.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        Color(out)
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}
