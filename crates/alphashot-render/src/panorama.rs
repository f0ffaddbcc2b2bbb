//! External 360-degree capture collaborator.

use alphashot_core::{CaptureError, PixelBuffer, Result};

/// Horizontal resolutions accepted for panorama captures.
pub const PANORAMA_RESOLUTIONS: [u32; 4] = [1024, 2048, 4096, 8192];

/// A collaborator that captures a full 360-degree equirectangular view
/// around the current camera position.
///
/// The pipeline does not assemble cube faces itself; an engine-side
/// implementation returns the finished equirectangular buffer. Stereo
/// panoramas are produced by running the source once per eye offset and
/// stitching the results without trim, since cropping at the wrap-around
/// seam is not acceptable.
#[allow(async_fn_in_trait)]
pub trait PanoramaSource {
    /// Captures an equirectangular view `resolution` pixels wide.
    ///
    /// # Errors
    /// Returns [`CaptureError::NoCaptureSource`] if no camera exists.
    async fn capture_panorama(&mut self, resolution: u32) -> Result<PixelBuffer>;
}

/// Validates a requested panorama resolution.
///
/// # Errors
/// Returns [`CaptureError::InvalidRequest`] unless the resolution is one of
/// [`PANORAMA_RESOLUTIONS`].
pub fn validate_panorama_resolution(resolution: u32) -> Result<()> {
    if PANORAMA_RESOLUTIONS.contains(&resolution) {
        Ok(())
    } else {
        Err(CaptureError::InvalidRequest(format!(
            "panorama resolution {resolution} not one of {PANORAMA_RESOLUTIONS:?}"
        )))
    }
}
