//! Box-filter downscaling for supersampled captures.

use alphashot_core::{CaptureError, PixelBuffer, Result};

/// Downscales a supersampled buffer back to its target size with a true
/// area average: each destination pixel is the mean of the
/// `factor x factor` source block at `(dx * factor, dy * factor)`, rounded
/// half up. Nearest-neighbor or bilinear sampling would keep the aliasing
/// supersampling is meant to remove.
///
/// A factor of 1 returns the input unchanged. The kernel position depends
/// only on `factor` and the destination coordinates, so identical inputs
/// always produce byte-identical outputs.
///
/// # Errors
/// Returns [`CaptureError::InvalidRequest`] if the input dimensions are not
/// exactly `target * factor`.
pub fn downscale(
    buffer: PixelBuffer,
    target_width: u32,
    target_height: u32,
    factor: u32,
) -> Result<PixelBuffer> {
    if buffer.width() != target_width * factor || buffer.height() != target_height * factor {
        return Err(CaptureError::InvalidRequest(format!(
            "buffer is {}x{}, expected {}x{} for target {target_width}x{target_height} at factor {factor}",
            buffer.width(),
            buffer.height(),
            target_width * factor,
            target_height * factor
        )));
    }
    if factor == 1 {
        return Ok(buffer);
    }

    let ch = buffer.channels();
    let src = buffer.data();
    let src_stride = buffer.width() as usize * ch;
    let block = factor as usize;
    let count = (block * block) as u32;

    let mut out = Vec::with_capacity(target_width as usize * target_height as usize * ch);
    for dy in 0..target_height as usize {
        for dx in 0..target_width as usize {
            for c in 0..ch {
                let mut sum = 0u32;
                for sy in 0..block {
                    let row = (dy * block + sy) * src_stride;
                    for sx in 0..block {
                        sum += u32::from(src[row + (dx * block + sx) * ch + c]);
                    }
                }
                out.push(((sum + count / 2) / count) as u8);
            }
        }
    }

    PixelBuffer::from_raw(target_width, target_height, buffer.layout(), out)
}
