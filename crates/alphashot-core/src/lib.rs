//! Core abstractions for alphashot.
//!
//! This crate provides the fundamental types used throughout alphashot:
//! - [`PixelBuffer`] - CPU-side pixel data passed between pipeline stages
//! - [`CaptureRequest`] - validated description of one desired output
//! - [`CaptureOptions`] - the persistent configuration surface
//! - [`CaptureEvents`] - pre/post-capture notification points
//! - Error types shared by every stage

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod error;
pub mod events;
pub mod options;
pub mod request;

pub use buffer::{ChannelLayout, PixelBuffer};
pub use error::{CaptureError, Result};
pub use events::{CaptureEvents, HandlerError};
pub use options::{CaptureOptions, NameFormat};
pub use request::{CaptureRequest, ResolutionLimits, StereoParams, TransparencyMode};
