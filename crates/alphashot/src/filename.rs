//! Output filename templating.

use chrono::{DateTime, Local};

use alphashot_core::{CaptureOptions, CaptureRequest, NameFormat, TransparencyMode};
use alphashot_render::OutputFormat;

/// Tag describing what kind of capture a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Opaque rendered capture.
    Render,
    /// Rendered capture with transparency.
    Alpha,
    /// Side-by-side stereoscopic capture.
    StereoRender,
    /// Equirectangular panorama.
    Panorama,
    /// Stereoscopic panorama.
    StereoPanorama,
}

impl CaptureKind {
    /// The tag used in filenames.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            CaptureKind::Render => "Render",
            CaptureKind::Alpha => "Alpha",
            CaptureKind::StereoRender => "3D-Render",
            CaptureKind::Panorama => "360",
            CaptureKind::StereoPanorama => "3D-360",
        }
    }

    /// The kind a request will produce.
    #[must_use]
    pub fn for_request(request: &CaptureRequest) -> Self {
        if request.stereo.is_some() {
            CaptureKind::StereoRender
        } else if request.transparency == TransparencyMode::None {
            CaptureKind::Render
        } else {
            CaptureKind::Alpha
        }
    }
}

/// Builds a capture filename from the configured format.
///
/// The timestamp is passed in rather than sampled here so callers (and
/// tests) control it.
#[must_use]
pub fn capture_filename(
    options: &CaptureOptions,
    kind: CaptureKind,
    format: OutputFormat,
    timestamp: DateTime<Local>,
) -> String {
    let name = if options.name_override.is_empty() {
        options.product_name.as_str()
    } else {
        options.name_override.as_str()
    };
    let date = timestamp.format("%Y-%m-%d-%H-%M-%S");
    let tag = kind.tag();
    let ext = format.extension();

    match options.name_format {
        NameFormat::NameDate => format!("{name}-{date}.{ext}"),
        NameFormat::NameTypeDate => format!("{name}-{tag}-{date}.{ext}"),
        NameFormat::NameDateType => format!("{name}-{date}-{tag}.{ext}"),
        NameFormat::TypeDate => format!("{tag}-{date}.{ext}"),
        NameFormat::TypeNameDate => format!("{tag}-{name}-{date}.{ext}"),
        NameFormat::Date => format!("{date}.{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 14, 12, 34, 56).unwrap()
    }

    #[test]
    fn all_formats() {
        let mut options = CaptureOptions {
            product_name: "Game".into(),
            ..CaptureOptions::default()
        };
        let cases = [
            (NameFormat::NameDate, "Game-2024-03-14-12-34-56.png"),
            (NameFormat::NameTypeDate, "Game-Alpha-2024-03-14-12-34-56.png"),
            (NameFormat::NameDateType, "Game-2024-03-14-12-34-56-Alpha.png"),
            (NameFormat::TypeDate, "Alpha-2024-03-14-12-34-56.png"),
            (NameFormat::TypeNameDate, "Alpha-Game-2024-03-14-12-34-56.png"),
            (NameFormat::Date, "2024-03-14-12-34-56.png"),
        ];
        for (format, expected) in cases {
            options.name_format = format;
            let name = capture_filename(
                &options,
                CaptureKind::Alpha,
                OutputFormat::Png,
                fixed_time(),
            );
            assert_eq!(name, expected);
        }
    }

    #[test]
    fn name_override_wins() {
        let options = CaptureOptions {
            product_name: "Game".into(),
            name_override: "Session".into(),
            name_format: NameFormat::NameDate,
            ..CaptureOptions::default()
        };
        let name = capture_filename(
            &options,
            CaptureKind::Render,
            OutputFormat::Jpeg { quality: 90 },
            fixed_time(),
        );
        assert_eq!(name, "Session-2024-03-14-12-34-56.jpg");
    }

    #[test]
    fn kind_from_request() {
        let mut request = CaptureRequest::new(100, 100);
        assert_eq!(CaptureKind::for_request(&request), CaptureKind::Render);
        request.transparency = TransparencyMode::FullAlpha;
        assert_eq!(CaptureKind::for_request(&request), CaptureKind::Alpha);
        request.stereo = Some(alphashot_core::StereoParams::default());
        assert_eq!(CaptureKind::for_request(&request), CaptureKind::StereoRender);
    }
}
