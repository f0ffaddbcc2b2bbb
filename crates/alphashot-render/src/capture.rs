//! Frame capturer: drives the host renderer through one pass and converts
//! the readback into a [`PixelBuffer`].

use alphashot_core::{CaptureError, CaptureRequest, ChannelLayout, PixelBuffer, Result};

use crate::host::{
    ensure_capture_source, BackgroundMode, PassKind, PostEffects, Readback, ReadbackFormat,
    RenderHost,
};
use crate::scope::{RenderStateScope, StateOverrides};

/// Captures one pass of the scene at the request's supersampled size.
///
/// The matte pass renders against a transparent background with the
/// backdrop hidden and post effects off; the color pass keeps the scene
/// as-is (post effects are still disabled while supersampling, where
/// ambient occlusion bands). All state mutation is scoped and reverted
/// before this function returns, including on error.
///
/// # Errors
/// - [`CaptureError::NoCaptureSource`] if no camera exists; detected before
///   any state mutation.
/// - [`CaptureError::ReadbackFailed`] if the readback is malformed;
///   surfaced after state restoration.
pub async fn capture<H>(host: &mut H, request: &CaptureRequest, pass: PassKind) -> Result<PixelBuffer>
where
    H: RenderHost + PostEffects,
{
    ensure_capture_source(host)?;

    let width = request.scaled_width();
    let height = request.scaled_height();

    let (overrides, background) = match pass {
        PassKind::Color if request.supersampling > 1 => {
            (StateOverrides::supersampled_color(), BackgroundMode::Keep)
        }
        PassKind::Color => (StateOverrides::hold(), BackgroundMode::Keep),
        PassKind::Matte => (StateOverrides::matte(), BackgroundMode::TransparentBlack),
    };

    log::debug!("capturing {pass:?} pass at {width}x{height}");

    let mut scope = RenderStateScope::apply(host, overrides);
    let host = scope.host();

    // The scene must be fully rendered before a capture is valid, and each
    // pass of a multi-pass sequence needs its own frame submission.
    host.end_of_frame().await;
    let frame = host.render_frame(width, height, background)?;
    let readback = host.read_back(frame).await?;

    drop(scope);

    into_buffer(&readback, width, height)
}

/// Unpacks a readback into a tightly packed RGBA [`PixelBuffer`], stripping
/// row padding and quantizing float samples.
///
/// # Errors
/// Returns [`CaptureError::ReadbackFailed`] if the byte count does not
/// match the expected dimensions.
pub fn into_buffer(readback: &Readback, width: u32, height: u32) -> Result<PixelBuffer> {
    let bpp = readback.format.bytes_per_pixel();
    let row_bytes = width as usize * bpp;
    let stride = readback.padded_bytes_per_row as usize;

    if stride < row_bytes || readback.bytes.len() != stride * height as usize {
        return Err(CaptureError::ReadbackFailed(format!(
            "readback holds {} bytes, expected {} rows of stride {stride} covering {row_bytes}",
            readback.bytes.len(),
            height
        )));
    }

    // Copy row by row, dropping the copy-alignment padding.
    let mut packed = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        packed.extend_from_slice(&readback.bytes[start..start + row_bytes]);
    }

    match readback.format {
        ReadbackFormat::Rgba8 => PixelBuffer::from_raw(width, height, ChannelLayout::Rgba, packed),
        ReadbackFormat::RgbaF32 => {
            // pod_collect_to_vec copies, so the u8 data needs no alignment
            let samples: Vec<f32> = bytemuck::pod_collect_to_vec(&packed);
            PixelBuffer::from_rgba_f32(width, height, &samples)
        }
    }
}
