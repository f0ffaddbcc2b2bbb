//! alphashot: a capture compositing pipeline for host renderers.
//!
//! alphashot turns a renderer's basic primitives (render a frame, read the
//! pixels back) into finished screenshots: transparent captures composited
//! from a matte pass, supersampled captures downscaled back to target size,
//! side-by-side stereoscopic pairs, and equirectangular panoramas.
//!
//! # Quick Start
//!
//! ```no_run
//! use alphashot::*;
//!
//! # async fn demo<H: RenderHost + PostEffects>(host: H) -> Result<()> {
//! let mut pipeline = CapturePipeline::new(host);
//!
//! let mut request = CaptureRequest::new(1920, 1080);
//! request.supersampling = 2;
//! request.transparency = TransparencyMode::FullAlpha;
//!
//! let buffer = pipeline.capture(&request).await?;
//!
//! let options = CaptureOptions::default();
//! let path = write_capture(&buffer, &options, CaptureKind::for_request(&request))?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The host engine stays on the other side of two traits:
//!
//! - [`RenderHost`] - camera access, render state, frame rendering and
//!   asynchronous pixel readback
//! - [`PostEffects`] - disabling capture-incompatible screen effects
//!
//! [`CapturePipeline`] sequences the passes for each capture mode and
//! guarantees every piece of render state it touches is restored, on
//! success and on failure alike. Panoramas come from an external
//! [`PanoramaSource`] collaborator; the pipeline adds the stereo camera
//! choreography and seam-safe stitching on top.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]

pub mod filename;
pub mod output;
pub mod pipeline;

// Re-export core types
pub use alphashot_core::{
    CaptureError, CaptureEvents, CaptureOptions, CaptureRequest, ChannelLayout, HandlerError,
    NameFormat, PixelBuffer, ResolutionLimits, Result, StereoParams, TransparencyMode,
};

// Re-export pipeline stages and host seams
pub use alphashot_render::{
    alpha_matte, downscale, encode, save_image, stitch, validate_panorama_resolution,
    BackgroundMode, CameraPose, OutputFormat, PanoramaSource, PassKind, PostEffects, Readback,
    ReadbackFormat, RenderHost, RenderState, RenderStateScope, StateOverrides,
    PANORAMA_RESOLUTIONS,
};

pub use filename::{capture_filename, CaptureKind};
pub use output::{output_format, write_capture};
pub use pipeline::CapturePipeline;

pub use glam::Vec3;

/// Initializes env-filtered logging for applications embedding alphashot.
///
/// Honors `RUST_LOG`; defaults to `info`. Safe to call more than once -
/// later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
