//! End-to-end pipeline tests against a scripted host.
//!
//! The fake host renders flat-color frames whose red channel encodes which
//! stereo eye the camera sits at, and mattes that are foreground on the
//! left half only. That makes the composited, stitched and downscaled
//! outputs fully predictable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pollster::FutureExt;

use alphashot::*;

const HOME: Vec3 = Vec3::new(1.0, 2.0, 3.0);

/// Red channel value for a camera at `position`, keyed off the stereo eye
/// offset from [`HOME`].
fn eye_color(position: Vec3) -> u8 {
    let dx = position.x - HOME.x;
    if dx > 0.001 {
        200 // right eye
    } else if dx < -0.001 {
        50 // left eye
    } else {
        100 // home position
    }
}

struct FakeHost {
    has_camera: bool,
    camera: Arc<Mutex<Vec3>>,
    state: RenderState,
    effects_enabled: bool,
    fail_readback: bool,
    frames_rendered: u32,
    max_render_width: u32,
}

impl FakeHost {
    fn new() -> Self {
        Self {
            has_camera: true,
            camera: Arc::new(Mutex::new(HOME)),
            state: RenderState::default(),
            effects_enabled: true,
            fail_readback: false,
            frames_rendered: 0,
            max_render_width: 0,
        }
    }

    fn camera(&self) -> Vec3 {
        *self.camera.lock().unwrap()
    }
}

struct Frame {
    width: u32,
    height: u32,
    background: BackgroundMode,
    eye: u8,
}

impl RenderHost for FakeHost {
    type Frame = Frame;

    fn has_capture_source(&self) -> bool {
        self.has_camera
    }

    fn camera_pose(&self) -> Option<CameraPose> {
        self.has_camera.then(|| CameraPose {
            position: self.camera(),
            right: Vec3::X,
        })
    }

    fn set_camera_position(&mut self, position: Vec3) {
        *self.camera.lock().unwrap() = position;
    }

    fn render_state(&self) -> RenderState {
        self.state
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.state = state;
    }

    fn render_frame(
        &mut self,
        width: u32,
        height: u32,
        background: BackgroundMode,
    ) -> Result<Frame> {
        self.frames_rendered += 1;
        self.max_render_width = self.max_render_width.max(width);
        Ok(Frame {
            width,
            height,
            background,
            eye: eye_color(self.camera()),
        })
    }

    async fn read_back(&mut self, frame: Frame) -> Result<Readback> {
        if self.fail_readback {
            return Err(CaptureError::ReadbackFailed("simulated".into()));
        }
        let mut bytes = Vec::with_capacity(frame.width as usize * frame.height as usize * 4);
        for _y in 0..frame.height {
            for x in 0..frame.width {
                let px = match frame.background {
                    // Matte pass: subject covers the left half of the frame.
                    BackgroundMode::TransparentBlack => {
                        if x < frame.width / 2 {
                            [255, 255, 255, 255]
                        } else {
                            [0, 0, 0, 0]
                        }
                    }
                    _ => [frame.eye, 100, 100, 255],
                };
                bytes.extend_from_slice(&px);
            }
        }
        Ok(Readback::packed(bytes, ReadbackFormat::Rgba8, frame.width))
    }

    async fn end_of_frame(&mut self) {}
}

impl PostEffects for FakeHost {
    type Token = bool;

    fn disable_for_capture(&mut self) -> bool {
        std::mem::replace(&mut self.effects_enabled, false)
    }

    fn restore(&mut self, token: bool) {
        self.effects_enabled = token;
    }
}

/// Panorama collaborator that colors its output by the host camera's
/// current eye position, observed through the shared camera cell.
struct FakePano {
    camera: Arc<Mutex<Vec3>>,
    captures: u32,
}

impl PanoramaSource for FakePano {
    async fn capture_panorama(&mut self, resolution: u32) -> Result<PixelBuffer> {
        self.captures += 1;
        let eye = eye_color(*self.camera.lock().unwrap());
        Ok(PixelBuffer::filled(
            resolution,
            resolution / 2,
            ChannelLayout::Rgba,
            &[eye, 100, 100, 255],
        ))
    }
}

#[test]
fn opaque_supersampled_capture() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut request = CaptureRequest::new(800, 600);
    request.supersampling = 2;

    let buffer = pipeline.capture(&request).block_on().unwrap();

    assert_eq!((buffer.width(), buffer.height()), (800, 600));
    assert_eq!(buffer.layout(), ChannelLayout::Rgb);
    assert_eq!(buffer.pixel(400, 300), &[100, 100, 100]);

    let host = pipeline.into_host();
    assert_eq!(host.frames_rendered, 1);
    assert_eq!(host.max_render_width, 1600);
    // Post effects were toggled for the oversized render and put back.
    assert!(host.effects_enabled);
}

#[test]
fn full_alpha_capture_composites_matte() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut request = CaptureRequest::new(400, 300);
    request.transparency = TransparencyMode::FullAlpha;

    let buffer = pipeline.capture(&request).block_on().unwrap();

    assert_eq!((buffer.width(), buffer.height()), (400, 300));
    assert_eq!(buffer.layout(), ChannelLayout::Rgba);
    // Left half: foreground, opaque. Right half: background, transparent.
    // Color comes from the color pass either way.
    assert_eq!(buffer.pixel(10, 150), &[100, 100, 100, 255]);
    assert_eq!(buffer.pixel(390, 150), &[100, 100, 100, 0]);

    assert_eq!(pipeline.into_host().frames_rendered, 2);
}

#[test]
fn stereo_capture_stitches_both_eyes() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut request = CaptureRequest::new(1000, 800);
    request.stereo = Some(StereoParams::default()); // sep 0.18, overlap 0.25, flipped

    let buffer = pipeline.capture(&request).block_on().unwrap();

    // 25% overlap trims 250 columns from each half: 2 * (1000 - 250).
    assert_eq!((buffer.width(), buffer.height()), (1500, 800));
    assert_eq!(buffer.layout(), ChannelLayout::Rgb);
    // Flipped for cross-eyed viewing: right eye on the left half.
    assert_eq!(buffer.pixel(0, 400)[0], 200);
    assert_eq!(buffer.pixel(1499, 400)[0], 50);

    let host = pipeline.into_host();
    assert_eq!(host.frames_rendered, 2);
    assert_eq!(host.camera(), HOME);
}

#[test]
fn unflipped_stereo_keeps_left_eye_left() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut request = CaptureRequest::new(100, 100);
    request.stereo = Some(StereoParams {
        flip_eyes: false,
        ..StereoParams::default()
    });

    let buffer = pipeline.capture(&request).block_on().unwrap();
    assert_eq!(buffer.pixel(0, 50)[0], 50);
    assert_eq!(buffer.pixel(149, 50)[0], 200);
}

#[test]
fn missing_camera_fails_before_any_work() {
    let pre_fired = Arc::new(AtomicUsize::new(0));

    let mut host = FakeHost::new();
    host.has_camera = false;
    let mut pipeline = CapturePipeline::new(host);

    let counter = Arc::clone(&pre_fired);
    pipeline.events_mut().on_pre_capture(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let result = pipeline.capture(&CaptureRequest::new(800, 600)).block_on();
    assert!(matches!(result, Err(CaptureError::NoCaptureSource)));
    assert_eq!(pre_fired.load(Ordering::SeqCst), 0);
    assert_eq!(pipeline.into_host().frames_rendered, 0);
}

#[test]
fn invalid_request_is_rejected_before_events() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());

    let result = pipeline.capture(&CaptureRequest::new(1, 600)).block_on();
    assert!(matches!(result, Err(CaptureError::InvalidRequest(_))));

    // The same oversized request passes under the extreme cap.
    let oversized = CaptureRequest::new(5000, 600);
    let mut pipeline =
        CapturePipeline::new(pipeline.into_host()).with_limits(ResolutionLimits::extreme());
    assert!(pipeline.capture(&oversized).block_on().is_ok());
}

#[test]
fn failed_readback_restores_state_and_fires_post_event() {
    let post_fired = Arc::new(AtomicUsize::new(0));

    let mut host = FakeHost::new();
    host.fail_readback = true;
    let mut pipeline = CapturePipeline::new(host);

    let counter = Arc::clone(&post_fired);
    pipeline.events_mut().on_post_capture(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let mut request = CaptureRequest::new(64, 64);
    request.transparency = TransparencyMode::Cutout;
    let result = pipeline.capture(&request).block_on();

    assert!(matches!(result, Err(CaptureError::ReadbackFailed(_))));
    assert_eq!(post_fired.load(Ordering::SeqCst), 1);

    let host = pipeline.into_host();
    assert_eq!(host.render_state(), RenderState::default());
    assert!(host.effects_enabled);
    assert_eq!(host.camera(), HOME);
}

#[test]
fn events_fire_once_per_invocation_and_errors_are_isolated() {
    let pre = Arc::new(AtomicUsize::new(0));
    let post = Arc::new(AtomicUsize::new(0));

    let mut pipeline = CapturePipeline::new(FakeHost::new());
    pipeline
        .events_mut()
        .on_pre_capture(|| Err("deliberate handler failure".into()));
    let counter = Arc::clone(&pre);
    pipeline.events_mut().on_pre_capture(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let counter = Arc::clone(&post);
    pipeline.events_mut().on_post_capture(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    // A transparent capture runs two passes but is one invocation.
    let mut request = CaptureRequest::new(64, 64);
    request.transparency = TransparencyMode::FullAlpha;
    pipeline.capture(&request).block_on().unwrap();

    assert_eq!(pre.load(Ordering::SeqCst), 1);
    assert_eq!(post.load(Ordering::SeqCst), 1);

    pipeline.capture(&CaptureRequest::new(64, 64)).block_on().unwrap();
    assert_eq!(pre.load(Ordering::SeqCst), 2);
    assert_eq!(post.load(Ordering::SeqCst), 2);
}

#[test]
fn mono_panorama_delegates_to_source() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut pano = FakePano {
        camera: Arc::clone(&pipeline.host().camera),
        captures: 0,
    };

    let buffer = pipeline
        .capture_panorama(&mut pano, 1024, None)
        .block_on()
        .unwrap();

    assert_eq!((buffer.width(), buffer.height()), (1024, 512));
    assert_eq!(buffer.pixel(512, 256)[0], 100); // camera never moved
    assert_eq!(pano.captures, 1);
}

#[test]
fn stereo_panorama_stitches_without_trim() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut pano = FakePano {
        camera: Arc::clone(&pipeline.host().camera),
        captures: 0,
    };

    let buffer = pipeline
        .capture_panorama(&mut pano, 1024, Some(StereoParams::default()))
        .block_on()
        .unwrap();

    // No overlap trim at the wrap-around seam: full double width.
    assert_eq!((buffer.width(), buffer.height()), (2048, 512));
    assert_eq!(buffer.pixel(0, 256)[0], 200);
    assert_eq!(buffer.pixel(2047, 256)[0], 50);
    assert_eq!(pano.captures, 2);
    assert_eq!(pipeline.into_host().camera(), HOME);
}

#[test]
fn panorama_rejects_bad_resolution_and_params() {
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut pano = FakePano {
        camera: Arc::clone(&pipeline.host().camera),
        captures: 0,
    };

    let result = pipeline.capture_panorama(&mut pano, 1000, None).block_on();
    assert!(matches!(result, Err(CaptureError::InvalidRequest(_))));

    let bad_stereo = StereoParams {
        eye_separation: 0.7,
        ..StereoParams::default()
    };
    let result = pipeline
        .capture_panorama(&mut pano, 2048, Some(bad_stereo))
        .block_on();
    assert!(matches!(result, Err(CaptureError::InvalidRequest(_))));
    assert_eq!(pano.captures, 0);
}

#[test]
fn capture_then_write_end_to_end() {
    let dir = std::env::temp_dir().join("alphashot-pipeline-e2e");
    let mut pipeline = CapturePipeline::new(FakeHost::new());
    let mut request = CaptureRequest::new(64, 48);
    request.transparency = TransparencyMode::FullAlpha;

    let buffer = pipeline.capture(&request).block_on().unwrap();

    let options = CaptureOptions {
        screenshot_dir: dir.clone(),
        ..CaptureOptions::default()
    };
    let path = write_capture(&buffer, &options, CaptureKind::for_request(&request)).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (64, 48));
    assert_eq!(decoded.get_pixel(1, 1).0, [100, 100, 100, 255]);
    assert_eq!(decoded.get_pixel(62, 1).0[3], 0);

    std::fs::remove_dir_all(&dir).ok();
}
