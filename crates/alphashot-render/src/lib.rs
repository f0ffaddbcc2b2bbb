//! Pipeline stages for alphashot.
//!
//! This crate holds the three cooperating capture stages and the seams to
//! the host engine:
//! - [`host`] - traits for the consumed capture and readback primitives
//! - [`scope`] - scoped render-state override with guaranteed restoration
//! - [`capture`] - the frame capturer (one pass per call)
//! - [`composite`] - alpha-matte combination and stereo stitching
//! - [`resample`] - supersample box downscaling
//! - [`panorama`] - the external 360-degree collaborator seam
//! - [`screenshot`] - PNG/JPEG encoding of finished buffers

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Casts between pixel coordinates and float fractions are range-checked by
// request validation
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod capture;
pub mod composite;
pub mod host;
pub mod panorama;
pub mod resample;
pub mod scope;
pub mod screenshot;

pub use capture::{capture, into_buffer};
pub use composite::{alpha_matte, stitch};
pub use host::{
    BackgroundMode, CameraPose, PassKind, PostEffects, Readback, ReadbackFormat, RenderHost,
    RenderState,
};
pub use panorama::{validate_panorama_resolution, PanoramaSource, PANORAMA_RESOLUTIONS};
pub use resample::downscale;
pub use scope::{RenderStateScope, StateOverrides};
pub use screenshot::{encode, save_image, OutputFormat};
