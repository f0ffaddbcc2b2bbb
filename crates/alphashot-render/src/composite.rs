//! Compositor: alpha-matte combination and side-by-side stitching.

use alphashot_core::{CaptureError, ChannelLayout, PixelBuffer, Result, TransparencyMode};

/// Rec.601 luma of a pixel's first three channels, in `0..=255`.
fn luma(px: &[u8]) -> u32 {
    (299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2])) / 1000
}

/// Combines a color pass and a matte pass into one RGBA buffer.
///
/// RGB comes from `color`; alpha is derived from the matte's luminance.
/// The matte renders the subject against an empty background, so bright
/// matte pixels are foreground. `FullAlpha` maps luminance directly to
/// alpha; `Cutout` thresholds at mid-gray to fully opaque or fully
/// transparent.
///
/// Both inputs are consumed; the result is a new buffer.
///
/// # Errors
/// Returns [`CaptureError::InvalidRequest`] if the buffers' dimensions
/// differ or `mode` is [`TransparencyMode::None`].
pub fn alpha_matte(
    color: PixelBuffer,
    matte: PixelBuffer,
    mode: TransparencyMode,
) -> Result<PixelBuffer> {
    if mode == TransparencyMode::None {
        return Err(CaptureError::InvalidRequest(
            "alpha-matte composite requires a transparency mode".into(),
        ));
    }
    if color.width() != matte.width() || color.height() != matte.height() {
        return Err(CaptureError::InvalidRequest(format!(
            "color pass is {}x{} but matte pass is {}x{}",
            color.width(),
            color.height(),
            matte.width(),
            matte.height()
        )));
    }

    let (width, height) = (color.width(), color.height());
    let color_ch = color.channels();
    let matte_ch = matte.channels();
    let color_data = color.data();
    let matte_data = matte.data();

    // Pure per-pixel function: no dependency between pixels.
    let mut out = Vec::with_capacity(width as usize * height as usize * 4);
    for (cpx, mpx) in color_data
        .chunks_exact(color_ch)
        .zip(matte_data.chunks_exact(matte_ch))
    {
        let alpha = match mode {
            TransparencyMode::FullAlpha => luma(mpx) as u8,
            TransparencyMode::Cutout => {
                if luma(mpx) >= 128 {
                    255
                } else {
                    0
                }
            }
            TransparencyMode::None => unreachable!(),
        };
        out.extend_from_slice(&cpx[..3]);
        out.push(alpha);
    }

    PixelBuffer::from_raw(width, height, ChannelLayout::Rgba, out)
}

/// Stitches two equally sized buffers side by side.
///
/// `trim = floor(width * overlap_fraction)` columns are cut from the
/// facing edges: the output's left half is `left`'s columns
/// `[0, width - trim)` and its right half is `right`'s columns
/// `[trim, width)`, yielding an output `2 * (width - trim)` wide. With
/// `flip` set the inputs swap sides, producing a cross-eye ordered pair.
///
/// # Errors
/// Returns [`CaptureError::InvalidRequest`] if the buffers differ in size
/// or layout, or `overlap_fraction` is outside `[0, 1)`.
pub fn stitch(
    left: PixelBuffer,
    right: PixelBuffer,
    overlap_fraction: f32,
    flip: bool,
) -> Result<PixelBuffer> {
    if flip {
        return stitch(right, left, overlap_fraction, false);
    }

    if left.width() != right.width()
        || left.height() != right.height()
        || left.layout() != right.layout()
    {
        return Err(CaptureError::InvalidRequest(format!(
            "stitch inputs differ: {}x{} {:?} vs {}x{} {:?}",
            left.width(),
            left.height(),
            left.layout(),
            right.width(),
            right.height(),
            right.layout()
        )));
    }
    if !(0.0..1.0).contains(&overlap_fraction) {
        return Err(CaptureError::InvalidRequest(format!(
            "overlap fraction {overlap_fraction} outside [0, 1)"
        )));
    }

    let width = left.width();
    let height = left.height();
    let layout = left.layout();
    let ch = layout.channels();

    let trim = (width as f32 * overlap_fraction).floor() as u32;
    let half = width - trim;
    let out_width = 2 * half;

    let mut out = Vec::with_capacity(out_width as usize * height as usize * ch);
    for y in 0..height {
        let lrow = left.row(y);
        let rrow = right.row(y);
        // left's columns [0, half)
        out.extend_from_slice(&lrow[..half as usize * ch]);
        // right's columns [trim, width)
        out.extend_from_slice(&rrow[trim as usize * ch..]);
    }

    PixelBuffer::from_raw(out_width, height, layout, out)
}
