//! Encoding captured buffers to PNG or JPEG.

use std::path::Path;

use image::{ImageBuffer, Rgb, Rgba};

use alphashot_core::{CaptureError, ChannelLayout, PixelBuffer, Result};

/// Output encoding for a finished capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless PNG; keeps the alpha channel.
    Png,
    /// JPEG at the given quality (1-100). Drops transparency.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }
}

/// Encodes a buffer into an in-memory image file.
///
/// # Errors
/// Returns [`CaptureError::EncodeFailed`] if encoding fails.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => match buffer.layout() {
            ChannelLayout::Rgba => {
                let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    image_from(buffer, buffer.data().to_vec())?;
                img.write_to(&mut bytes, image::ImageFormat::Png)
                    .map_err(encode_err)?;
            }
            ChannelLayout::Rgb => {
                let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    image_from(buffer, buffer.data().to_vec())?;
                img.write_to(&mut bytes, image::ImageFormat::Png)
                    .map_err(encode_err)?;
            }
        },
        OutputFormat::Jpeg { quality } => {
            // JPEG has no alpha channel
            let rgb = buffer.clone().into_rgb();
            let img: ImageBuffer<Rgb<u8>, Vec<u8>> = image_from(&rgb, rgb.data().to_vec())?;
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
            img.write_with_encoder(encoder).map_err(encode_err)?;
        }
    }
    Ok(bytes.into_inner())
}

/// Encodes a buffer and writes it to `path`.
///
/// # Errors
/// Returns [`CaptureError::EncodeFailed`] if encoding fails, or an I/O
/// error from the write.
pub fn save_image(path: &Path, buffer: &PixelBuffer, format: OutputFormat) -> Result<()> {
    let bytes = encode(buffer, format)?;
    std::fs::write(path, bytes)?;
    log::debug!("image written to {}", path.display());
    Ok(())
}

fn image_from<P: image::Pixel<Subpixel = u8>>(
    buffer: &PixelBuffer,
    data: Vec<u8>,
) -> Result<ImageBuffer<P, Vec<u8>>> {
    ImageBuffer::from_raw(buffer.width(), buffer.height(), data).ok_or_else(|| {
        CaptureError::EncodeFailed(format!(
            "buffer data does not fit {}x{} image",
            buffer.width(),
            buffer.height()
        ))
    })
}

fn encode_err(err: image::ImageError) -> CaptureError {
    CaptureError::EncodeFailed(err.to_string())
}
