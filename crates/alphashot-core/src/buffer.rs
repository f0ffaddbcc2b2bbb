//! CPU-side pixel buffers produced and consumed by the pipeline stages.

use crate::error::{CaptureError, Result};

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Three channels, 8 bits each.
    Rgb,
    /// Four channels, 8 bits each.
    Rgba,
}

impl ChannelLayout {
    /// Number of bytes per pixel for this layout.
    #[must_use]
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

/// A rectangular grid of 8-bit pixels, row-major with top-left origin.
///
/// Buffers are owned exclusively by whichever pipeline stage currently holds
/// them. Every transformation (compositing, resampling) consumes its inputs
/// by value and produces a new buffer, so no buffer is ever mutated by more
/// than one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    #[must_use]
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Self {
        let len = width as usize * height as usize * layout.channels();
        Self {
            width,
            height,
            layout,
            data: vec![0; len],
        }
    }

    /// Creates a buffer filled with a uniform color.
    ///
    /// `color` must have exactly one sample per channel of `layout`.
    #[must_use]
    pub fn filled(width: u32, height: u32, layout: ChannelLayout, color: &[u8]) -> Self {
        debug_assert_eq!(color.len(), layout.channels());
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * layout.channels());
        for _ in 0..pixels {
            data.extend_from_slice(color);
        }
        Self {
            width,
            height,
            layout,
            data,
        }
    }

    /// Wraps raw sample data in a buffer, validating its length.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidRequest`] if the dimensions are zero or
    /// `data` does not hold exactly `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::InvalidRequest(format!(
                "buffer dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(CaptureError::InvalidRequest(format!(
                "buffer data length {} does not match {width}x{height} {layout:?} (expected {expected})",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Quantizes floating-point RGBA samples into an 8-bit RGBA buffer.
    ///
    /// Used by the HDR readback path. Samples are clamped to `[0, 1]` and
    /// rounded to the nearest 8-bit value.
    ///
    /// # Errors
    /// Returns [`CaptureError::InvalidRequest`] if `samples` does not hold
    /// exactly `width * height * 4` values.
    pub fn from_rgba_f32(width: u32, height: u32, samples: &[f32]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if samples.len() != expected {
            return Err(CaptureError::InvalidRequest(format!(
                "float sample count {} does not match {width}x{height} RGBA (expected {expected})",
                samples.len()
            )));
        }
        let data = samples
            .iter()
            .map(|s| {
                let clamped = s.clamp(0.0, 1.0);
                // round-to-nearest is required for the uniform-color
                // downscale property to hold through this path
                (clamped * 255.0).round() as u8
            })
            .collect();
        Self::from_raw(width, height, ChannelLayout::Rgba, data)
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    #[must_use]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Bytes per pixel.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Raw sample data, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer, returning its raw sample data.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Samples of row `y`.
    ///
    /// # Panics
    /// Panics if `y` is out of bounds.
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let stride = self.width as usize * self.channels();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height);
        let ch = self.channels();
        let idx = (y as usize * self.width as usize + x as usize) * ch;
        &self.data[idx..idx + ch]
    }

    /// Converts the buffer to RGB, dropping the alpha channel if present.
    #[must_use]
    pub fn into_rgb(self) -> PixelBuffer {
        match self.layout {
            ChannelLayout::Rgb => self,
            ChannelLayout::Rgba => {
                let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
                for px in self.data.chunks_exact(4) {
                    data.extend_from_slice(&px[..3]);
                }
                Self {
                    width: self.width,
                    height: self.height,
                    layout: ChannelLayout::Rgb,
                    data,
                }
            }
        }
    }
}
