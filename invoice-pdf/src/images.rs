use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use crate::paginate::Size;

/// Errors from decoding or constructing a raster image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not a PNG image")]
    NotPng,
    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported PNG color type: {0:?}")]
    UnsupportedColor(png::ColorType),
    #[error("image has zero width or height ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("pixel buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("cannot read image file: {0}")]
    Io(#[from] std::io::Error),
}

/// PDF color space for image samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }

    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceGray => 1,
        }
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Decoded 8-bit raster, ready to embed as an image XObject.
/// Alpha, when present, is kept as a separate gray plane (PDF SMask).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub pixels: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Wrap raw samples, checking the buffer matches the dimensions.
    pub fn from_pixels(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        let expected = width as usize * height as usize * color_space.components();
        if pixels.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(RasterImage {
            width,
            height,
            color_space,
            pixels,
            alpha: None,
        })
    }

    /// A uniformly gray image.
    pub fn blank(width: u32, height: u32, level: u8) -> Result<Self, ImageError> {
        let len = width as usize * height as usize;
        Self::from_pixels(width, height, ColorSpace::DeviceGray, vec![level; len])
    }

    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let file = File::open(path)?;
        decode_png(BufReader::new(file))
    }

    pub fn from_png_bytes(data: &[u8]) -> Result<Self, ImageError> {
        if !data.starts_with(&PNG_MAGIC) {
            return Err(ImageError::NotPng);
        }
        decode_png(data)
    }

    /// Pixel dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

/// Decode a PNG, normalizing palettes, low bit depths and 16-bit samples
/// to 8-bit gray or RGB with an optional alpha plane.
fn decode_png<R: std::io::Read>(source: R) -> Result<RasterImage, ImageError> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width, info.height);
    if width == 0 || height == 0 {
        return Err(ImageError::Empty { width, height });
    }

    let (color_space, pixels, alpha) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, buf, None),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, buf, None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split_alpha(&buf, 4);
            (ColorSpace::DeviceRGB, rgb, Some(alpha))
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split_alpha(&buf, 2);
            (ColorSpace::DeviceGray, gray, Some(alpha))
        }
        other => return Err(ImageError::UnsupportedColor(other)),
    };

    Ok(RasterImage {
        width,
        height,
        color_space,
        pixels,
        alpha,
    })
}

/// Split interleaved samples whose last channel is alpha.
fn split_alpha(buf: &[u8], stride: usize) -> (Vec<u8>, Vec<u8>) {
    let count = buf.len() / stride;
    let mut color = Vec::with_capacity(count * (stride - 1));
    let mut alpha = Vec::with_capacity(count);
    for px in buf.chunks_exact(stride) {
        color.extend_from_slice(&px[..stride - 1]);
        alpha.push(px[stride - 1]);
    }
    (color, alpha)
}
