//! Configuration options for alphashot.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::{CaptureRequest, ResolutionLimits, StereoParams, TransparencyMode};

/// Filename layouts for saved captures.
///
/// `Name` is the configured product name, `Type` the capture-type tag
/// (`Render`, `Alpha`, `3D-Render`, `360`, `3D-360`), and the date part is
/// a `YYYY-MM-DD-HH-MM-SS` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NameFormat {
    /// `Name-Date`
    NameDate,
    /// `Name-Type-Date`
    NameTypeDate,
    /// `Name-Date-Type`
    #[default]
    NameDateType,
    /// `Type-Date`
    TypeDate,
    /// `Type-Name-Date`
    TypeNameDate,
    /// `Date`
    Date,
}

/// User-facing configuration for the capture pipeline.
///
/// Mirrors the persistent settings surface: resolution, supersampling,
/// transparency, stereo and panorama parameters, and output naming.
/// Serializable so embedders can persist it as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Output width of rendered captures in pixels.
    pub resolution_x: u32,

    /// Output height of rendered captures in pixels.
    pub resolution_y: u32,

    /// Raise the resolution cap from 4k to 16k. Captures that large can
    /// exhaust memory.
    pub allow_extreme_resolutions: bool,

    /// Render at this multiple of the output size, then downscale.
    pub supersampling: u32,

    /// Transparency mode for rendered captures.
    pub transparency: TransparencyMode,

    /// Save captures as JPEG instead of PNG. JPEG drops transparency.
    pub use_jpg: bool,

    /// JPEG quality, 1-100.
    pub jpg_quality: u8,

    /// Directory captures are written to.
    pub screenshot_dir: PathBuf,

    /// Filename layout for saved captures.
    pub name_format: NameFormat,

    /// Product name used in filenames.
    pub product_name: String,

    /// When non-empty, overrides `product_name` in filenames.
    pub name_override: String,

    /// Horizontal resolution of equirectangular panorama captures.
    /// Accepted values: 1024, 2048, 4096, 8192.
    pub panorama_resolution: u32,

    /// Distance between the two eyes in stereoscopic captures.
    pub eye_separation: f32,

    /// Fraction by which the stereo images are moved closer together.
    pub overlap_offset: f32,

    /// Swap left and right eye for cross-eyed viewing.
    pub flip_eyes: bool,

    /// Log saved-capture messages at info level instead of debug.
    pub screenshot_message: bool,

    /// Remembered output resolutions, selectable from embedding UIs.
    pub saved_resolutions: Vec<(u32, u32)>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            resolution_x: 1920,
            resolution_y: 1080,
            allow_extreme_resolutions: false,
            supersampling: 2,
            transparency: TransparencyMode::None,
            use_jpg: false,
            jpg_quality: 100,
            screenshot_dir: PathBuf::from("cap"),
            name_format: NameFormat::default(),
            product_name: String::from("alphashot"),
            name_override: String::new(),
            panorama_resolution: 4096,
            eye_separation: 0.18,
            overlap_offset: 0.25,
            flip_eyes: true,
            screenshot_message: true,
            saved_resolutions: Vec::new(),
        }
    }
}

impl CaptureOptions {
    /// Resolution limits implied by the extreme-resolution flag.
    #[must_use]
    pub fn limits(&self) -> ResolutionLimits {
        if self.allow_extreme_resolutions {
            ResolutionLimits::extreme()
        } else {
            ResolutionLimits::standard()
        }
    }

    /// Stereo parameters from the configured values.
    #[must_use]
    pub fn stereo_params(&self) -> StereoParams {
        StereoParams {
            eye_separation: self.eye_separation,
            overlap_fraction: self.overlap_offset,
            flip_eyes: self.flip_eyes,
        }
    }

    /// Builds a validated single-view request from the configured values.
    ///
    /// # Errors
    /// Returns [`crate::CaptureError::InvalidRequest`] if a configured value
    /// is out of bounds.
    pub fn request(&self) -> Result<CaptureRequest> {
        let request = CaptureRequest {
            width: self.resolution_x,
            height: self.resolution_y,
            supersampling: self.supersampling,
            transparency: self.transparency,
            stereo: None,
        };
        request.validate(self.limits())?;
        Ok(request)
    }

    /// Builds a validated stereoscopic request from the configured values.
    ///
    /// # Errors
    /// Returns [`crate::CaptureError::InvalidRequest`] if a configured value
    /// is out of bounds.
    pub fn stereo_request(&self) -> Result<CaptureRequest> {
        let mut request = self.request()?;
        request.stereo = Some(self.stereo_params());
        request.validate(self.limits())?;
        Ok(request)
    }

    /// Remembers the current output resolution if it is not saved yet.
    pub fn save_current_resolution(&mut self) {
        let entry = (self.resolution_x, self.resolution_y);
        if !self.saved_resolutions.contains(&entry) {
            self.saved_resolutions.push(entry);
        }
    }

    /// Forgets a previously saved resolution.
    pub fn delete_resolution(&mut self, width: u32, height: u32) {
        self.saved_resolutions.retain(|&r| r != (width, height));
    }

    /// Serializes the options to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the options to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::debug!("capture options saved to {}", path.display());
        Ok(())
    }

    /// Loads options from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_a_valid_request() {
        let options = CaptureOptions::default();
        let request = options.request().unwrap();
        assert_eq!(request.width, 1920);
        assert_eq!(request.supersampling, 2);
        assert!(request.stereo.is_none());

        let stereo = options.stereo_request().unwrap();
        assert!(stereo.stereo.is_some());
    }

    #[test]
    fn extreme_flag_raises_the_cap() {
        let mut options = CaptureOptions {
            resolution_x: 8192,
            ..CaptureOptions::default()
        };
        assert!(options.request().is_err());
        options.allow_extreme_resolutions = true;
        assert!(options.request().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let mut options = CaptureOptions::default();
        options.save_current_resolution();
        options.use_jpg = true;
        options.jpg_quality = 85;

        let json = options.to_json().unwrap();
        let restored = CaptureOptions::from_json(&json).unwrap();
        assert_eq!(restored.saved_resolutions, vec![(1920, 1080)]);
        assert!(restored.use_jpg);
        assert_eq!(restored.jpg_quality, 85);
    }

    #[test]
    fn saved_resolutions_dedupe_and_delete() {
        let mut options = CaptureOptions::default();
        options.save_current_resolution();
        options.save_current_resolution();
        assert_eq!(options.saved_resolutions.len(), 1);

        options.delete_resolution(1920, 1080);
        assert!(options.saved_resolutions.is_empty());
    }
}
