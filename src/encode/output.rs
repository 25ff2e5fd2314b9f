use std::str::FromStr;

use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, RgbImage,
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    imageops::FilterType,
};

use crate::{
    assets::raster::Raster,
    foundation::{
        core::{PixelSize, Rgb8},
        error::{MockupError, MockupResult},
    },
};

/// Encoded container of the final mockup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG.
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl OutputFormat {
    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = MockupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(MockupError::validation(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

/// Output encoding settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputOpts {
    /// Container for the full-size mockup.
    pub format: OutputFormat,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Colour behind any remaining transparency.
    pub background: Rgb8,
    /// Also produce a cover-cropped JPEG thumbnail.
    pub thumbnail: bool,
    /// Thumbnail width.
    pub thumbnail_width: u32,
    /// Thumbnail height.
    pub thumbnail_height: u32,
    /// Thumbnail JPEG quality, 1..=100.
    pub thumbnail_quality: u8,
}

impl Default for OutputOpts {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            jpeg_quality: 95,
            background: Rgb8::new(255, 255, 255),
            thumbnail: false,
            thumbnail_width: 400,
            thumbnail_height: 300,
            thumbnail_quality: 80,
        }
    }
}

impl OutputOpts {
    /// Reject qualities outside 1..=100 and empty thumbnail sizes.
    pub fn validate(&self) -> MockupResult<()> {
        for (name, q) in [
            ("jpeg_quality", self.jpeg_quality),
            ("thumbnail_quality", self.thumbnail_quality),
        ] {
            if !(1..=100).contains(&q) {
                return Err(MockupError::validation(format!(
                    "{name} must be within 1..=100 (got {q})"
                )));
            }
        }
        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(MockupError::validation("thumbnail size must be non-zero"));
        }
        Ok(())
    }
}

/// Flatten and encode a raster into the configured container.
#[tracing::instrument(skip(raster), fields(w = raster.width, h = raster.height))]
pub fn encode(raster: &Raster, opts: &OutputOpts) -> MockupResult<Vec<u8>> {
    opts.validate()?;
    let rgb = flat_rgb(raster, opts.background)?;
    let bytes = match opts.format {
        OutputFormat::Jpeg => encode_jpeg(&rgb, opts.jpeg_quality)?,
        OutputFormat::Png => {
            let mut out = Vec::new();
            PngEncoder::new(&mut out)
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|e| MockupError::encoding(format!("png: {e}")))?;
            out
        }
    };
    tracing::debug!(format = ?opts.format, len = bytes.len(), "encoded mockup");
    Ok(bytes)
}

/// Cover-cropped JPEG preview of `raster` at the configured thumbnail size.
#[tracing::instrument(level = "debug", skip(raster), fields(w = raster.width, h = raster.height))]
pub fn thumbnail(raster: &Raster, opts: &OutputOpts) -> MockupResult<(PixelSize, Vec<u8>)> {
    opts.validate()?;
    let rgb = flat_rgb(raster, opts.background)?;
    let thumb = DynamicImage::ImageRgb8(rgb)
        .resize_to_fill(
            opts.thumbnail_width,
            opts.thumbnail_height,
            FilterType::Lanczos3,
        )
        .into_rgb8();
    let size = PixelSize::new(thumb.width(), thumb.height());
    Ok((size, encode_jpeg(&thumb, opts.thumbnail_quality)?))
}

fn flat_rgb(raster: &Raster, background: Rgb8) -> MockupResult<RgbImage> {
    if raster.width == 0 || raster.height == 0 {
        return Err(MockupError::encoding("cannot encode an empty raster"));
    }
    let data = raster.flatten_rgb8([background.r, background.g, background.b]);
    RgbImage::from_raw(raster.width, raster.height, data)
        .ok_or_else(|| MockupError::encoding("raster buffer does not match its size"))
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> MockupResult<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| MockupError::encoding(format!("jpeg: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
