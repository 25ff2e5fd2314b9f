use std::{fmt, str::FromStr};

use crate::foundation::error::{MockupError, MockupResult};

pub use kurbo::{Rect, Size};

const CM_PER_INCH: f64 = 2.54;

/// Physical length unit accepted for artwork sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Unit {
    /// Inches.
    #[serde(rename = "in")]
    Inches,
    /// Centimetres.
    #[serde(rename = "cm")]
    Centimeters,
}

impl Unit {
    /// Convert a length in this unit to inches.
    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Unit::Inches => value,
            Unit::Centimeters => value / CM_PER_INCH,
        }
    }

    /// Short canonical label (`in` / `cm`).
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Inches => "in",
            Unit::Centimeters => "cm",
        }
    }
}

impl FromStr for Unit {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" | "\"" => Ok(Unit::Inches),
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Ok(Unit::Centimeters)
            }
            other => Err(MockupError::invalid_dimension(format!(
                "unknown unit '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared physical size of an artwork.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhysicalSize {
    /// Width in `unit`.
    pub width: f64,
    /// Height in `unit`.
    pub height: f64,
    /// Unit of `width` and `height`.
    pub unit: Unit,
}

impl PhysicalSize {
    /// Build a validated physical size.
    pub fn new(width: f64, height: f64, unit: Unit) -> MockupResult<Self> {
        let size = Self {
            width,
            height,
            unit,
        };
        size.validate()?;
        Ok(size)
    }

    /// Reject non-finite or non-positive sides.
    pub fn validate(&self) -> MockupResult<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(MockupError::invalid_dimension(format!(
                    "{name} must be > 0 (got {v})"
                )));
            }
        }
        Ok(())
    }

    /// Width in inches.
    pub fn width_in(&self) -> f64 {
        self.unit.to_inches(self.width)
    }

    /// Height in inches.
    pub fn height_in(&self) -> f64 {
        self.unit.to_inches(self.height)
    }
}

impl fmt::Display for PhysicalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.unit)
    }
}

/// Integer pixel size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Construct a pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Longer of the two sides.
    pub fn long_edge(self) -> u32 {
        self.width.max(self.height)
    }

    /// `width / height` as a float.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    pub(crate) fn to_kurbo(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Axis-aligned integer rectangle in raster coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Construct a rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Size of the rectangle.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Whether the rectangle lies fully inside a raster of `bounds`.
    pub fn fits_within(&self, bounds: PixelSize) -> bool {
        self.right() <= u64::from(bounds.width) && self.bottom() <= u64::from(bounds.height)
    }

    /// Intersection with a raster of `bounds`; `None` when empty.
    pub fn clamp_to(&self, bounds: PixelSize) -> Option<Self> {
        let x0 = self.x.min(bounds.width);
        let y0 = self.y.min(bounds.height);
        let x1 = self.right().min(u64::from(bounds.width)) as u32;
        let y1 = self.bottom().min(u64::from(bounds.height)) as u32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub(crate) fn to_kurbo(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

/// Aspect classification of an image or an artwork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Wider than tall.
    Landscape,
    /// Taller than wide.
    Portrait,
    /// Roughly equal sides.
    Square,
}

impl Orientation {
    /// Classify a declared artwork size.
    ///
    /// Sides closer than two units apart count as square.
    pub fn for_artwork(size: &PhysicalSize) -> Self {
        if (size.width - size.height).abs() < 2.0 {
            Orientation::Square
        } else if size.width > size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Classify a raster; aspect ratios within 2% of 1.0 count as square.
    pub fn of_pixels(size: PixelSize) -> Self {
        let aspect = size.aspect();
        if (aspect - 1.0).abs() <= 0.02 {
            Orientation::Square
        } else if aspect > 1.0 {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl FromStr for Orientation {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            "square" => Ok(Orientation::Square),
            other => Err(MockupError::validation(format!(
                "unknown orientation '{other}'"
            ))),
        }
    }
}

/// Straight (non-premultiplied) opaque colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> MockupResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(MockupError::validation(format!(
                "colour must be #rrggbb (got '{s}')"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| MockupError::validation(format!("invalid hex colour '{s}'")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Opaque premultiplied RGBA8 pixel.
    pub fn opaque(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Scale all channels by `k` (clamped), used for shading.
    pub fn shade(self, k: f32) -> Self {
        let f = |c: u8| (f32::from(c) * k).round().clamp(0.0, 255.0) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = MockupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
