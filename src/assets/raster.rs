use crate::foundation::{
    core::{PixelRect, PixelSize},
    error::{MockupError, MockupResult},
};

/// Owned raster in row-major premultiplied RGBA8.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

pub(crate) fn buffer_len(width: u32, height: u32) -> MockupResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MockupError::validation("raster buffer size overflow"))
}

impl Raster {
    /// Fully transparent raster.
    pub fn transparent(width: u32, height: u32) -> MockupResult<Self> {
        Ok(Self {
            width,
            height,
            data: vec![0u8; buffer_len(width, height)?],
        })
    }

    /// Raster filled with one premultiplied pixel.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> MockupResult<Self> {
        let len = buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    /// Wrap existing premultiplied bytes.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> MockupResult<Self> {
        if data.len() != buffer_len(width, height)? {
            return Err(MockupError::validation(
                "raster data must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiply a straight-alpha `image` buffer.
    pub fn from_straight(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            data,
        }
    }

    /// Size of the raster.
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    /// Whether every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    /// Read one premultiplied pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Write one premultiplied pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Fill a rectangle (clipped to the raster) with one pixel value.
    pub fn fill_rect(&mut self, rect: PixelRect, px: [u8; 4]) {
        let Some(r) = rect.clamp_to(self.size()) else {
            return;
        };
        for y in r.y..r.y + r.height {
            let start = self.index(r.x, y);
            let end = start + (r.width as usize) * 4;
            for chunk in self.data[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// Premultiplied buffer as an `image` buffer (for resampling).
    pub(crate) fn to_premul_image(&self) -> MockupResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| MockupError::validation("raster buffer does not match its size"))
    }

    pub(crate) fn from_premul_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Flatten over an opaque background and return straight RGB8.
    pub fn flatten_rgb8(&self, bg: [u8; 3]) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for s in self.data.chunks_exact(4) {
            let inv = 255u16 - u16::from(s[3]);
            for c in 0..3 {
                let v = u16::from(s[c]) + u16::from(crate::foundation::math::mul_div255(
                    u16::from(bg[c]),
                    inv,
                ));
                out.push(v.min(255) as u8);
            }
        }
        out
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
