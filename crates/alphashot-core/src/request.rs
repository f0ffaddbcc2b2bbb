//! Capture requests and their validation.

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};

/// Transparency handling for rendered captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransparencyMode {
    /// Opaque capture, background kept.
    #[default]
    None,
    /// Hard cutout: matte luminance thresholded to fully opaque or fully
    /// transparent.
    Cutout,
    /// Full alpha: matte luminance mapped directly to the alpha channel.
    FullAlpha,
}

/// Parameters for stereoscopic (two-eye) captures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StereoParams {
    /// Distance between the two eye positions, in world units.
    pub eye_separation: f32,
    /// Fraction of each image width trimmed when stitching, moving the two
    /// halves closer together.
    pub overlap_fraction: f32,
    /// Swap the left and right images for cross-eyed viewing.
    pub flip_eyes: bool,
}

impl StereoParams {
    /// Checks the stereo parameter bounds.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidRequest`] naming the first violated
    /// bound.
    pub fn validate(&self) -> Result<()> {
        if !(0.01..=0.5).contains(&self.eye_separation) {
            return Err(CaptureError::InvalidRequest(format!(
                "eye separation {} outside [0.01, 0.5]",
                self.eye_separation
            )));
        }
        if !(0.0..1.0).contains(&self.overlap_fraction) {
            return Err(CaptureError::InvalidRequest(format!(
                "overlap fraction {} outside [0, 1)",
                self.overlap_fraction
            )));
        }
        Ok(())
    }
}

impl Default for StereoParams {
    fn default() -> Self {
        Self {
            eye_separation: 0.18,
            overlap_fraction: 0.25,
            flip_eyes: true,
        }
    }
}

/// Bounds for requested output resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionLimits {
    /// Largest accepted width or height in pixels.
    pub max: u32,
}

impl ResolutionLimits {
    /// Smallest accepted width or height in pixels.
    pub const MIN: u32 = 2;

    /// The standard resolution cap.
    #[must_use]
    pub fn standard() -> Self {
        Self { max: 4096 }
    }

    /// The raised cap for extreme resolutions. Captures this large can
    /// exhaust memory; opting in is the caller's responsibility.
    #[must_use]
    pub fn extreme() -> Self {
        Self { max: 15360 }
    }
}

impl Default for ResolutionLimits {
    fn default() -> Self {
        Self::standard()
    }
}

/// An immutable description of one desired capture output.
///
/// Construct the struct directly and call [`CaptureRequest::validate`]
/// before handing it to the pipeline; the pipeline re-validates on entry
/// and reports violations as [`CaptureError::InvalidRequest`] before any
/// scene state is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Target output width in pixels.
    pub width: u32,
    /// Target output height in pixels.
    pub height: u32,
    /// Supersampling factor: the scene is rendered at `factor` times the
    /// target size and downscaled back, suppressing aliasing.
    pub supersampling: u32,
    /// Transparency mode.
    pub transparency: TransparencyMode,
    /// Stereoscopic parameters, if this is a two-eye capture.
    pub stereo: Option<StereoParams>,
}

impl CaptureRequest {
    /// Creates an opaque, non-stereo request at the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            supersampling: 1,
            transparency: TransparencyMode::None,
            stereo: None,
        }
    }

    /// Width of the raw capture before downscaling.
    #[must_use]
    pub fn scaled_width(&self) -> u32 {
        self.width * self.supersampling
    }

    /// Height of the raw capture before downscaling.
    #[must_use]
    pub fn scaled_height(&self) -> u32 {
        self.height * self.supersampling
    }

    /// Checks all request invariants against the given resolution limits.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidRequest`] naming the first violated
    /// bound.
    pub fn validate(&self, limits: ResolutionLimits) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value < ResolutionLimits::MIN || value > limits.max {
                return Err(CaptureError::InvalidRequest(format!(
                    "{name} {value} outside [{}, {}]",
                    ResolutionLimits::MIN,
                    limits.max
                )));
            }
        }
        if !(1..=4).contains(&self.supersampling) {
            return Err(CaptureError::InvalidRequest(format!(
                "supersampling factor {} outside [1, 4]",
                self.supersampling
            )));
        }
        if let Some(stereo) = &self.stereo {
            stereo.validate()?;
        }
        Ok(())
    }
}
