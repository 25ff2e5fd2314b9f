use std::{fmt, str::FromStr};

use crate::{
    dimension::resolver::length_to_px,
    foundation::{
        core::Rgb8,
        error::{MockupError, MockupResult},
    },
};

/// Closed catalog of frame mouldings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrameStyle {
    /// No frame.
    None,
    /// Thin flat black moulding.
    ThinBlack,
    /// Thin flat white moulding.
    ThinWhite,
    /// Classic gold with bevel.
    ClassicGold,
    /// Classic silver with bevel.
    ClassicSilver,
    /// Wide gold with ridged profile.
    OrnateGold,
    /// Wide dark bronze with ridged profile.
    OrnateDark,
    /// Light oak grain.
    NaturalOak,
    /// Dark walnut grain.
    NaturalWalnut,
    /// Pale maple grain.
    NaturalMaple,
    /// Floating panel, white lip.
    FloatingWhite,
    /// Floating panel, black lip.
    FloatingBlack,
    /// Deep box moulding.
    ShadowBox,
    /// Gallery-wrapped canvas, no moulding.
    CanvasWrap,
}

/// Rendering family a style is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFamily {
    /// No border pixels at all.
    Borderless,
    /// Solid fill, hard edges.
    Flat,
    /// Gradient + bevel sheen.
    Metallic,
    /// Metallic with a ridged profile.
    Ornate,
    /// Grain texture along each rail.
    Wood,
    /// Transparent border with a soft drop shadow.
    Floating,
    /// Dark deep moulding with inner shadow on the mat.
    ShadowBox,
}

impl FrameStyle {
    /// Every catalog entry, in catalog order.
    pub const ALL: [FrameStyle; 14] = [
        FrameStyle::None,
        FrameStyle::ThinBlack,
        FrameStyle::ThinWhite,
        FrameStyle::ClassicGold,
        FrameStyle::ClassicSilver,
        FrameStyle::OrnateGold,
        FrameStyle::OrnateDark,
        FrameStyle::NaturalOak,
        FrameStyle::NaturalWalnut,
        FrameStyle::NaturalMaple,
        FrameStyle::FloatingWhite,
        FrameStyle::FloatingBlack,
        FrameStyle::ShadowBox,
        FrameStyle::CanvasWrap,
    ];

    /// Kebab-case catalog name.
    pub fn as_str(self) -> &'static str {
        match self {
            FrameStyle::None => "none",
            FrameStyle::ThinBlack => "thin-black",
            FrameStyle::ThinWhite => "thin-white",
            FrameStyle::ClassicGold => "classic-gold",
            FrameStyle::ClassicSilver => "classic-silver",
            FrameStyle::OrnateGold => "ornate-gold",
            FrameStyle::OrnateDark => "ornate-dark",
            FrameStyle::NaturalOak => "natural-oak",
            FrameStyle::NaturalWalnut => "natural-walnut",
            FrameStyle::NaturalMaple => "natural-maple",
            FrameStyle::FloatingWhite => "floating-white",
            FrameStyle::FloatingBlack => "floating-black",
            FrameStyle::ShadowBox => "shadow-box",
            FrameStyle::CanvasWrap => "canvas-wrap",
        }
    }

    /// Which renderer draws this style.
    pub fn family(self) -> FrameFamily {
        match self {
            FrameStyle::None | FrameStyle::CanvasWrap => FrameFamily::Borderless,
            FrameStyle::ThinBlack | FrameStyle::ThinWhite => FrameFamily::Flat,
            FrameStyle::ClassicGold | FrameStyle::ClassicSilver => FrameFamily::Metallic,
            FrameStyle::OrnateGold | FrameStyle::OrnateDark => FrameFamily::Ornate,
            FrameStyle::NaturalOak | FrameStyle::NaturalWalnut | FrameStyle::NaturalMaple => {
                FrameFamily::Wood
            }
            FrameStyle::FloatingWhite | FrameStyle::FloatingBlack => FrameFamily::Floating,
            FrameStyle::ShadowBox => FrameFamily::ShadowBox,
        }
    }

    /// Border width used when the caller gives none, in inches.
    pub fn default_border_in(self) -> f64 {
        match self {
            FrameStyle::None | FrameStyle::CanvasWrap => 0.0,
            FrameStyle::ThinBlack | FrameStyle::ThinWhite => 0.5,
            FrameStyle::ClassicGold | FrameStyle::ClassicSilver => 1.5,
            FrameStyle::OrnateGold | FrameStyle::OrnateDark => 2.5,
            FrameStyle::NaturalOak | FrameStyle::NaturalWalnut | FrameStyle::NaturalMaple => 1.25,
            FrameStyle::FloatingWhite | FrameStyle::FloatingBlack => 1.0,
            FrameStyle::ShadowBox => 2.0,
        }
    }

    /// Physical depth off the wall in inches; drives the contact shadow.
    pub fn depth_in(self) -> f64 {
        match self {
            FrameStyle::None => 0.1,
            FrameStyle::ThinBlack | FrameStyle::ThinWhite => 0.75,
            FrameStyle::ClassicGold | FrameStyle::ClassicSilver => 1.0,
            FrameStyle::OrnateGold | FrameStyle::OrnateDark => 1.25,
            FrameStyle::NaturalOak | FrameStyle::NaturalWalnut | FrameStyle::NaturalMaple => 1.0,
            FrameStyle::FloatingWhite | FrameStyle::FloatingBlack | FrameStyle::CanvasWrap => 1.5,
            FrameStyle::ShadowBox => 2.0,
        }
    }

    /// Base material colour.
    pub fn base_color(self) -> Rgb8 {
        match self {
            FrameStyle::None | FrameStyle::CanvasWrap => Rgb8::new(255, 255, 255),
            FrameStyle::ThinBlack => Rgb8::new(0x1a, 0x1a, 0x1a),
            FrameStyle::ThinWhite => Rgb8::new(0xf4, 0xf4, 0xf2),
            FrameStyle::ClassicGold => Rgb8::new(0xc9, 0xa2, 0x27),
            FrameStyle::ClassicSilver => Rgb8::new(0xb8, 0xbc, 0xc2),
            FrameStyle::OrnateGold => Rgb8::new(0xb8, 0x8a, 0x1e),
            FrameStyle::OrnateDark => Rgb8::new(0x4a, 0x3b, 0x2a),
            FrameStyle::NaturalOak => Rgb8::new(0xc2, 0x96, 0x5e),
            FrameStyle::NaturalWalnut => Rgb8::new(0x5d, 0x40, 0x2b),
            FrameStyle::NaturalMaple => Rgb8::new(0xe3, 0xc9, 0x9a),
            FrameStyle::FloatingWhite => Rgb8::new(0xf7, 0xf7, 0xf5),
            FrameStyle::FloatingBlack => Rgb8::new(0x16, 0x16, 0x16),
            FrameStyle::ShadowBox => Rgb8::new(0x22, 0x22, 0x24),
        }
    }
}

impl FromStr for FrameStyle {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        FrameStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == needle)
            .ok_or_else(|| MockupError::unsupported_frame_style(format!("'{s}'")))
    }
}

impl TryFrom<String> for FrameStyle {
    type Error = MockupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrameStyle> for String {
    fn from(style: FrameStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for FrameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame treatment requested for an artwork.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpec {
    /// Catalog style.
    pub style: FrameStyle,
    /// Border width in inches; `None` uses the style default.
    #[serde(default)]
    pub border_width_in: Option<f64>,
    /// Optional override of the style's base colour.
    #[serde(default)]
    pub color: Option<Rgb8>,
    /// Free-form material hint carried through for auditing.
    #[serde(default)]
    pub material: Option<String>,
}

impl FrameSpec {
    /// No frame.
    pub fn none() -> Self {
        Self::new(FrameStyle::None)
    }

    /// A style with its default width and colour.
    pub fn new(style: FrameStyle) -> Self {
        Self {
            style,
            border_width_in: None,
            color: None,
            material: None,
        }
    }

    /// Override the border width (inches).
    pub fn with_border_in(mut self, inches: f64) -> Self {
        self.border_width_in = Some(inches);
        self
    }

    /// Effective border width in inches; always zero for borderless styles.
    pub fn border_in(&self) -> f64 {
        if self.style.family() == FrameFamily::Borderless {
            return 0.0;
        }
        self.border_width_in
            .unwrap_or_else(|| self.style.default_border_in())
    }

    /// Effective border width in pixels at `ppi`.
    pub fn border_px(&self, ppi: f64) -> MockupResult<u32> {
        self.validate()?;
        length_to_px(self.border_in(), ppi)
    }

    /// Base colour after applying the override.
    pub fn color(&self) -> Rgb8 {
        self.color.unwrap_or_else(|| self.style.base_color())
    }

    /// Reject negative or non-finite border widths.
    pub fn validate(&self) -> MockupResult<()> {
        if let Some(w) = self.border_width_in
            && (!w.is_finite() || w < 0.0)
        {
            return Err(MockupError::invalid_dimension(format!(
                "frame border width must be >= 0 (got {w})"
            )));
        }
        Ok(())
    }
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self::none()
    }
}

/// Closed catalog of mat boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatOption {
    /// No mat.
    None,
    /// Bright white board.
    White,
    /// Warm cream board.
    Cream,
    /// Black board.
    Black,
    /// Mid grey board.
    Grey,
}

impl MatOption {
    /// Every catalog entry.
    pub const ALL: [MatOption; 5] = [
        MatOption::None,
        MatOption::White,
        MatOption::Cream,
        MatOption::Black,
        MatOption::Grey,
    ];

    /// Lowercase catalog name.
    pub fn as_str(self) -> &'static str {
        match self {
            MatOption::None => "none",
            MatOption::White => "white",
            MatOption::Cream => "cream",
            MatOption::Black => "black",
            MatOption::Grey => "grey",
        }
    }

    /// Board colour; `None` for no mat.
    pub fn color(self) -> Option<Rgb8> {
        match self {
            MatOption::None => None,
            MatOption::White => Some(Rgb8::new(0xf7, 0xf5, 0xf0)),
            MatOption::Cream => Some(Rgb8::new(0xf1, 0xe9, 0xd2)),
            MatOption::Black => Some(Rgb8::new(0x1c, 0x1c, 0x1c)),
            MatOption::Grey => Some(Rgb8::new(0x9a, 0x9a, 0x9a)),
        }
    }
}

impl FromStr for MatOption {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        let needle = if needle == "gray" { "grey".to_string() } else { needle };
        MatOption::ALL
            .into_iter()
            .find(|m| m.as_str() == needle)
            .ok_or_else(|| MockupError::unsupported_mat_option(format!("'{s}'")))
    }
}

impl TryFrom<String> for MatOption {
    type Error = MockupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatOption> for String {
    fn from(m: MatOption) -> Self {
        m.as_str().to_string()
    }
}

impl fmt::Display for MatOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default mat width in inches.
pub const DEFAULT_MAT_WIDTH_IN: f64 = 2.0;

fn default_mat_width() -> f64 {
    DEFAULT_MAT_WIDTH_IN
}

/// Mat treatment requested for an artwork.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatSpec {
    /// Board option.
    pub option: MatOption,
    /// Width in inches; ignored when `option` is none.
    #[serde(default = "default_mat_width")]
    pub width_in: f64,
}

impl MatSpec {
    /// No mat.
    pub fn none() -> Self {
        Self {
            option: MatOption::None,
            width_in: DEFAULT_MAT_WIDTH_IN,
        }
    }

    /// A board option at `width_in` inches.
    pub fn new(option: MatOption, width_in: f64) -> Self {
        Self { option, width_in }
    }

    /// Effective width in inches.
    pub fn effective_in(&self) -> f64 {
        match self.option {
            MatOption::None => 0.0,
            _ => self.width_in,
        }
    }

    /// Effective width in pixels at `ppi`.
    pub fn width_px(&self, ppi: f64) -> MockupResult<u32> {
        self.validate()?;
        length_to_px(self.effective_in(), ppi)
    }

    /// Reject negative or non-finite widths on a real mat.
    pub fn validate(&self) -> MockupResult<()> {
        if self.option != MatOption::None && (!self.width_in.is_finite() || self.width_in < 0.0) {
            return Err(MockupError::invalid_dimension(format!(
                "mat width must be >= 0 (got {})",
                self.width_in
            )));
        }
        Ok(())
    }
}

impl Default for MatSpec {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/spec.rs"]
mod tests;
