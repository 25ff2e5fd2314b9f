use crate::{
    assets::raster::Raster,
    foundation::{
        core::PixelSize,
        error::{MockupError, MockupResult},
    },
};

/// Raster container formats accepted as input.
const ACCEPTED: [image::ImageFormat; 3] = [
    image::ImageFormat::Png,
    image::ImageFormat::Jpeg,
    image::ImageFormat::WebP,
];

/// Decode PNG/JPEG/WebP bytes into a premultiplied raster.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_raster(bytes: &[u8]) -> MockupResult<Raster> {
    let format = sniff_format(bytes)?;
    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| MockupError::asset_decode(format!("decode {format:?}: {e}")))?;
    let raster = Raster::from_straight(dyn_img.to_rgba8());
    if raster.width == 0 || raster.height == 0 {
        return Err(MockupError::asset_decode("decoded image has zero area"));
    }
    tracing::debug!(width = raster.width, height = raster.height, ?format, "decoded raster");
    Ok(raster)
}

/// Read only the pixel size of an encoded image.
pub fn probe_size(bytes: &[u8]) -> MockupResult<PixelSize> {
    let format = sniff_format(bytes)?;
    let reader = image::ImageReader::with_format(std::io::Cursor::new(bytes), format);
    let (w, h) = reader
        .into_dimensions()
        .map_err(|e| MockupError::asset_decode(format!("probe {format:?}: {e}")))?;
    Ok(PixelSize::new(w, h))
}

fn sniff_format(bytes: &[u8]) -> MockupResult<image::ImageFormat> {
    if bytes.is_empty() {
        return Err(MockupError::asset_decode("empty image data"));
    }
    let format = image::guess_format(bytes)
        .map_err(|e| MockupError::asset_decode(format!("unrecognised image data: {e}")))?;
    if !ACCEPTED.contains(&format) {
        return Err(MockupError::asset_decode(format!(
            "unsupported image format {format:?} (expected PNG, JPEG or WebP)"
        )));
    }
    Ok(format)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
