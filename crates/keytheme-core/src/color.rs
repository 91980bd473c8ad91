//! Color utilities for raster compositing.

/// RGBA color with f64 components (0.0 to 1.0 range), straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Create a new color with alpha = 1.0.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new color with alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create a grayscale color.
    pub const fn gray(value: f64) -> Self {
        Self::rgb(value, value, value)
    }

    /// Create black.
    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Create white.
    pub const fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Fully transparent black, the initial state of every fresh buffer.
    pub const fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// Linearly interpolate between two colors.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Clamp all components to [0.0, 1.0].
    pub fn clamp(&self) -> Color {
        Color {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGBA.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = self.clamp();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    /// Create from 8-bit RGBA.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0] as f64 / 255.0,
            g: rgba[1] as f64 / 255.0,
            b: rgba[2] as f64 / 255.0,
            a: rgba[3] as f64 / 255.0,
        }
    }

    /// Premultiply the color channels by alpha.
    pub fn premultiplied(&self) -> Color {
        Color {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    /// Undo [`Color::premultiplied`]. Zero alpha maps to transparent black.
    pub fn unpremultiplied(&self) -> Color {
        if self.a <= 0.0 {
            return Color::transparent();
        }
        Color {
            r: self.r / self.a,
            g: self.g / self.a,
            b: self.b / self.a,
            a: self.a,
        }
    }

    /// Source-over alpha compositing of `self` on top of `dst`.
    ///
    /// An opaque source replaces the destination and a fully transparent
    /// source leaves it untouched, both exactly.
    pub fn over(&self, dst: &Color) -> Color {
        if self.a >= 1.0 {
            return *self;
        }
        if self.a <= 0.0 {
            return *dst;
        }

        let inv = 1.0 - self.a;
        let a = self.a + dst.a * inv;
        if a <= 0.0 {
            return Color::transparent();
        }

        Color {
            r: (self.r * self.a + dst.r * dst.a * inv) / a,
            g: (self.g * self.a + dst.g * dst.a * inv) / a,
            b: (self.b * self.a + dst.b * dst.a * inv) / a,
            a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}
