//! Writing finished captures to the configured screenshot directory.

use std::fs;
use std::path::PathBuf;

use alphashot_core::{CaptureOptions, PixelBuffer, Result};
use alphashot_render::{encode, OutputFormat};

use crate::filename::{capture_filename, CaptureKind};

/// The encoding format an options struct selects.
#[must_use]
pub fn output_format(options: &CaptureOptions) -> OutputFormat {
    if options.use_jpg {
        OutputFormat::Jpeg {
            quality: options.jpg_quality,
        }
    } else {
        OutputFormat::Png
    }
}

/// Encodes `buffer` and writes it under `options.screenshot_dir`, creating
/// the directory if needed. Returns the path written.
///
/// # Errors
/// Returns [`alphashot_core::CaptureError::EncodeFailed`] if encoding
/// fails, or an I/O error from directory creation or the write.
pub fn write_capture(
    buffer: &PixelBuffer,
    options: &CaptureOptions,
    kind: CaptureKind,
) -> Result<PathBuf> {
    let format = output_format(options);
    let name = capture_filename(options, kind, format, chrono::Local::now());

    fs::create_dir_all(&options.screenshot_dir)?;
    let path = options.screenshot_dir.join(name);

    let bytes = encode(buffer, format)?;
    fs::write(&path, bytes)?;

    if options.screenshot_message {
        log::info!("saved {} capture to {}", kind.tag(), path.display());
    } else {
        log::debug!("saved {} capture to {}", kind.tag(), path.display());
    }
    Ok(path)
}
