use std::{fmt, str::FromStr};

use crate::{
    assets::{decode::decode_raster, raster::Raster},
    dimension::resolver::generation_size,
    foundation::{
        core::{Orientation, PhysicalSize, PixelRect, PixelSize},
        error::{MockupError, MockupResult},
    },
};

/// Kind of room an environment depicts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentCategory {
    /// Living room.
    LivingRoom,
    /// Bedroom.
    Bedroom,
    /// Office or study.
    Office,
    /// Gallery space.
    Gallery,
    /// Cafe.
    Cafe,
    /// Restaurant dining room.
    Restaurant,
    /// Hotel room or lobby.
    Hotel,
    /// Shop floor.
    Retail,
    /// Hallway or entrance.
    Hallway,
    /// Covered outdoor wall.
    Outdoor,
    /// Artist or photo studio.
    Studio,
    /// Library or reading room.
    Library,
    /// Industrial loft.
    Loft,
    /// Penthouse.
    Penthouse,
    /// Anything else.
    #[default]
    Custom,
}

impl EnvironmentCategory {
    /// Every category in catalog order.
    pub const ALL: [EnvironmentCategory; 15] = [
        EnvironmentCategory::LivingRoom,
        EnvironmentCategory::Bedroom,
        EnvironmentCategory::Office,
        EnvironmentCategory::Gallery,
        EnvironmentCategory::Cafe,
        EnvironmentCategory::Restaurant,
        EnvironmentCategory::Hotel,
        EnvironmentCategory::Retail,
        EnvironmentCategory::Hallway,
        EnvironmentCategory::Outdoor,
        EnvironmentCategory::Studio,
        EnvironmentCategory::Library,
        EnvironmentCategory::Loft,
        EnvironmentCategory::Penthouse,
        EnvironmentCategory::Custom,
    ];

    /// Kebab-case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            EnvironmentCategory::LivingRoom => "living-room",
            EnvironmentCategory::Bedroom => "bedroom",
            EnvironmentCategory::Office => "office",
            EnvironmentCategory::Gallery => "gallery",
            EnvironmentCategory::Cafe => "cafe",
            EnvironmentCategory::Restaurant => "restaurant",
            EnvironmentCategory::Hotel => "hotel",
            EnvironmentCategory::Retail => "retail",
            EnvironmentCategory::Hallway => "hallway",
            EnvironmentCategory::Outdoor => "outdoor",
            EnvironmentCategory::Studio => "studio",
            EnvironmentCategory::Library => "library",
            EnvironmentCategory::Loft => "loft",
            EnvironmentCategory::Penthouse => "penthouse",
            EnvironmentCategory::Custom => "custom",
        }
    }
}

impl FromStr for EnvironmentCategory {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| MockupError::validation(format!("unknown environment category '{s}'")))
    }
}

impl fmt::Display for EnvironmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive metadata attached to a background image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentMeta {
    /// Human-readable name.
    pub name: String,
    /// Room kind.
    #[serde(default)]
    pub category: EnvironmentCategory,
    /// Description of the wall surface, e.g. "warm white plaster".
    #[serde(default)]
    pub wall_color: Option<String>,
    /// Description of the light in the room.
    #[serde(default)]
    pub lighting: Option<String>,
    /// Overall mood.
    #[serde(default)]
    pub mood: Option<String>,
    /// Free-form search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Aspect class of the image.
    pub orientation: Orientation,
    /// Blank wall area in image pixels, when known.
    #[serde(default)]
    pub wall_region: Option<PixelRect>,
}

impl EnvironmentMeta {
    /// Minimal metadata for an image with no catalog entry.
    pub fn untitled(orientation: Orientation) -> Self {
        Self {
            name: "untitled".to_owned(),
            category: EnvironmentCategory::Custom,
            wall_color: None,
            lighting: None,
            mood: None,
            tags: Vec::new(),
            orientation,
            wall_region: None,
        }
    }
}

/// Encoded background plus its metadata.
#[derive(Clone)]
pub struct EnvironmentAsset {
    /// Encoded PNG/JPEG/WebP bytes.
    pub bytes: Vec<u8>,
    /// Descriptive metadata.
    pub meta: EnvironmentMeta,
}

impl fmt::Debug for EnvironmentAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentAsset")
            .field("bytes", &self.bytes.len())
            .field("meta", &self.meta)
            .finish()
    }
}

/// Decoded background ready for compositing.
#[derive(Clone, Debug)]
pub struct DecodedEnvironment {
    /// Premultiplied pixels.
    pub raster: Raster,
    /// Metadata with orientation matching the pixels.
    pub meta: EnvironmentMeta,
}

impl EnvironmentAsset {
    /// Wrap bytes with metadata inferred from the image header.
    pub fn from_bytes(bytes: Vec<u8>) -> MockupResult<Self> {
        let size = crate::assets::decode::probe_size(&bytes)?;
        Ok(Self {
            bytes,
            meta: EnvironmentMeta::untitled(Orientation::of_pixels(size)),
        })
    }

    /// Decode the image; the declared orientation is corrected to the pixel aspect.
    #[tracing::instrument(level = "debug", skip(self), fields(name = %self.meta.name))]
    pub fn decode(&self) -> MockupResult<DecodedEnvironment> {
        let raster = decode_raster(&self.bytes)?;
        let mut meta = self.meta.clone();
        let actual = Orientation::of_pixels(raster.size());
        if actual != meta.orientation {
            tracing::warn!(
                declared = ?meta.orientation,
                ?actual,
                "environment orientation does not match its pixels"
            );
            meta.orientation = actual;
        }
        Ok(DecodedEnvironment { raster, meta })
    }
}

/// What the caller wants a background for.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnvironmentRequest {
    /// Free-text description of the desired room.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Declared artwork size; drives the background orientation.
    pub artwork: PhysicalSize,
    /// Preferred room kind.
    #[serde(default)]
    pub category: Option<EnvironmentCategory>,
    /// Specific saved or template environment.
    #[serde(default)]
    pub environment_id: Option<String>,
}

impl EnvironmentRequest {
    /// Request for any background suiting `artwork`.
    pub fn for_artwork(artwork: PhysicalSize) -> Self {
        Self {
            prompt: None,
            artwork,
            category: None,
            environment_id: None,
        }
    }

    /// Background orientation matching the artwork.
    pub fn orientation(&self) -> Orientation {
        Orientation::for_artwork(&self.artwork)
    }

    /// Pixel size to ask a generator for.
    pub fn generation_size(&self) -> PixelSize {
        generation_size(self.orientation())
    }

    /// Full generation prompt: the caller's description plus fixed staging directions.
    pub fn render_prompt(&self) -> String {
        let room = match (&self.prompt, self.category) {
            (Some(p), _) if !p.trim().is_empty() => p.trim().to_owned(),
            (_, Some(c)) => format!("a {} interior", c.as_str().replace('-', " ")),
            _ => "a contemporary interior".to_owned(),
        };
        format!(
            "{room}. The wall where artwork would hang is prominently visible, evenly lit and \
             completely blank, with no paintings, frames or decorations. Photorealistic \
             architectural photography, artwork of {} to be displayed.",
            self.artwork
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/environment/model.rs"]
mod tests;
