//! Traits for the host engine collaborators the pipeline is built around.
//!
//! The pipeline never rasterizes anything itself. Rendering a frame into a
//! GPU target and reading that target back to CPU memory are primitives
//! supplied by the embedding engine through [`RenderHost`]; the engine's
//! post-processing stack is reached only through the small [`PostEffects`]
//! capability so no engine types leak into the pipeline core.

use alphashot_core::{CaptureError, Result};
use glam::Vec3;

/// Which render pass a capture performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// The normal color render of the scene.
    Color,
    /// An alpha/occlusion mask: the subject rendered against an empty
    /// background, with post effects off. Its brightness at a pixel encodes
    /// foreground versus background.
    Matte,
}

/// Background handling for a rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    /// Keep the scene's own clear state.
    Keep,
    /// Clear to opaque black.
    SolidBlack,
    /// Clear to transparent black, for matte passes.
    TransparentBlack,
}

/// Mutable renderer state the pipeline overrides and restores around passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    /// Clear mode and color applied when a frame starts.
    pub background: BackgroundMode,
    /// Whether the 2D backdrop object is visible.
    pub backdrop_visible: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            background: BackgroundMode::Keep,
            backdrop_visible: true,
        }
    }
}

/// Position and orientation basis of the active capture camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// World-space camera position.
    pub position: Vec3,
    /// World-space right vector, along which stereo eyes are offset.
    pub right: Vec3,
}

/// Sample format of a completed readback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadbackFormat {
    /// 8-bit RGBA, 4 bytes per pixel.
    Rgba8,
    /// 32-bit float RGBA, 16 bytes per pixel (HDR path).
    RgbaF32,
}

impl ReadbackFormat {
    /// Bytes per pixel for this format.
    #[must_use]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ReadbackFormat::Rgba8 => 4,
            ReadbackFormat::RgbaF32 => 16,
        }
    }
}

/// Raw bytes read back from a GPU target.
///
/// Rows may carry padding up to `padded_bytes_per_row`, the way GPU
/// copy-alignment rules leave them; the capturer strips it.
#[derive(Debug, Clone)]
pub struct Readback {
    /// Row-major sample bytes, including any row padding.
    pub bytes: Vec<u8>,
    /// Sample format of `bytes`.
    pub format: ReadbackFormat,
    /// Stride between the starts of consecutive rows, in bytes.
    pub padded_bytes_per_row: u32,
}

impl Readback {
    /// A readback with tightly packed rows.
    #[must_use]
    pub fn packed(bytes: Vec<u8>, format: ReadbackFormat, width: u32) -> Self {
        let padded_bytes_per_row = width * format.bytes_per_pixel() as u32;
        Self {
            bytes,
            format,
            padded_bytes_per_row,
        }
    }
}

/// The capture primitive supplied by the host engine.
///
/// `render_frame` is synchronous relative to the engine's render call but
/// the produced frame is only observable through the asynchronous
/// `read_back`. `end_of_frame` suspends until the engine reaches its next
/// frame boundary; captures are only valid there, and consecutive passes of
/// a multi-pass sequence must each wait for it.
#[allow(async_fn_in_trait)]
pub trait RenderHost {
    /// Opaque handle to a rendered-but-not-yet-read-back frame.
    type Frame;

    /// Whether a capturable camera/view currently exists.
    fn has_capture_source(&self) -> bool;

    /// Pose of the active capture camera, if any.
    fn camera_pose(&self) -> Option<CameraPose>;

    /// Moves the capture camera. Used for stereo eye offsets; callers must
    /// restore the prior position before returning control.
    fn set_camera_position(&mut self, position: Vec3);

    /// Current mutable renderer state.
    fn render_state(&self) -> RenderState;

    /// Replaces the mutable renderer state.
    fn set_render_state(&mut self, state: RenderState);

    /// Renders the scene once at the given size into a fresh GPU target.
    ///
    /// # Errors
    /// Returns [`CaptureError::NoCaptureSource`] if no camera exists.
    fn render_frame(
        &mut self,
        width: u32,
        height: u32,
        background: BackgroundMode,
    ) -> Result<Self::Frame>;

    /// Reads a rendered frame back to CPU memory. Resolves once the GPU
    /// work triggered by `render_frame` has completed.
    ///
    /// # Errors
    /// Returns [`CaptureError::ReadbackFailed`] if the readback does not
    /// complete.
    async fn read_back(&mut self, frame: Self::Frame) -> Result<Readback>;

    /// Suspends until the engine's next end-of-frame point.
    async fn end_of_frame(&mut self);
}

/// Capability for engine post effects that are incompatible with capture
/// (ambient occlusion banding under supersampling, depth of field, bloom).
///
/// Implementations snapshot whatever they disable into the token so
/// `restore` can put it back exactly.
pub trait PostEffects {
    /// Opaque snapshot of the disabled effects.
    type Token;

    /// Disables capture-incompatible effects, returning a restore token.
    fn disable_for_capture(&mut self) -> Self::Token;

    /// Re-enables previously disabled effects.
    fn restore(&mut self, token: Self::Token);
}

/// Fails early when the host has no capture source.
///
/// # Errors
/// Returns [`CaptureError::NoCaptureSource`]. Called before any scene
/// mutation so the failure has no side effects.
pub fn ensure_capture_source<H: RenderHost>(host: &H) -> Result<()> {
    if host.has_capture_source() {
        Ok(())
    } else {
        log::debug!("capture rejected - no camera found");
        Err(CaptureError::NoCaptureSource)
    }
}
