//! The pipeline orchestrator: sequences capture passes per mode and owns
//! the host for the duration of each run.

use alphashot_core::{
    CaptureError, CaptureEvents, CaptureRequest, PixelBuffer, ResolutionLimits, Result,
    StereoParams, TransparencyMode,
};
use alphashot_render::{
    alpha_matte, capture, downscale, host::ensure_capture_source, stitch,
    validate_panorama_resolution, PanoramaSource, PassKind, PostEffects, RenderHost,
    RenderStateScope, StateOverrides,
};

/// Sequences the capture stages for one output image.
///
/// The pipeline holds the host renderer exclusively: scene and camera state
/// is shared mutable state, so only one capture sequence may run at a time.
/// A request arriving while another is in flight is rejected with
/// [`CaptureError::CaptureInProgress`] rather than interleaved. There is no
/// cancellation - once a sequence starts mutating scene state it runs to
/// completion and restores that state on every path.
pub struct CapturePipeline<H: RenderHost + PostEffects> {
    host: H,
    events: CaptureEvents,
    limits: ResolutionLimits,
    in_flight: bool,
}

impl<H: RenderHost + PostEffects> CapturePipeline<H> {
    /// Creates a pipeline around a host with the standard resolution cap.
    pub fn new(host: H) -> Self {
        Self {
            host,
            events: CaptureEvents::new(),
            limits: ResolutionLimits::default(),
            in_flight: false,
        }
    }

    /// Replaces the resolution limits (e.g. the extreme cap).
    #[must_use]
    pub fn with_limits(mut self, limits: ResolutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The pre/post-capture notification registry.
    pub fn events_mut(&mut self) -> &mut CaptureEvents {
        &mut self.events
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Consumes the pipeline, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Runs one full capture sequence for `request` and returns the final
    /// buffer, ready for encoding.
    ///
    /// Opaque requests render one color pass; transparent requests add a
    /// matte pass and composite; stereo requests capture both eyes at
    /// offset camera positions and stitch them. Supersampled captures are
    /// box-downscaled back to the requested size.
    ///
    /// # Errors
    /// - [`CaptureError::InvalidRequest`] and
    ///   [`CaptureError::NoCaptureSource`] are detected before any scene
    ///   mutation or event dispatch.
    /// - [`CaptureError::CaptureInProgress`] if a sequence is already
    ///   running.
    /// - [`CaptureError::ReadbackFailed`] is surfaced after scene state has
    ///   been restored.
    pub async fn capture(&mut self, request: &CaptureRequest) -> Result<PixelBuffer> {
        request.validate(self.limits)?;
        ensure_capture_source(&self.host)?;
        self.begin_run()?;

        let result = match request.stereo {
            Some(stereo) => self.run_stereo(request, stereo).await,
            None => self.run_single(request).await,
        };

        self.finish_run();
        result
    }

    /// Runs one panorama capture through an external equirectangular
    /// collaborator, stereoscopically when `stereo` is given.
    ///
    /// Stereo panoramas are stitched without trim: cropping at the
    /// wrap-around seam is not acceptable.
    ///
    /// # Errors
    /// As for [`Self::capture`]; the resolution must be one of the accepted
    /// panorama sizes.
    pub async fn capture_panorama<P: PanoramaSource>(
        &mut self,
        source: &mut P,
        resolution: u32,
        stereo: Option<StereoParams>,
    ) -> Result<PixelBuffer> {
        validate_panorama_resolution(resolution)?;
        if let Some(stereo) = &stereo {
            stereo.validate()?;
        }
        ensure_capture_source(&self.host)?;
        self.begin_run()?;

        let result = match stereo {
            None => source.capture_panorama(resolution).await,
            Some(stereo) => self.run_stereo_panorama(source, resolution, stereo).await,
        };

        self.finish_run();
        result
    }

    fn begin_run(&mut self) -> Result<()> {
        if self.in_flight {
            return Err(CaptureError::CaptureInProgress);
        }
        self.in_flight = true;
        self.events.fire_pre_capture();
        Ok(())
    }

    fn finish_run(&mut self) {
        self.events.fire_post_capture();
        self.in_flight = false;
    }

    async fn run_single(&mut self, request: &CaptureRequest) -> Result<PixelBuffer> {
        let color = capture(&mut self.host, request, PassKind::Color).await?;

        let combined = match request.transparency {
            TransparencyMode::None => color,
            mode => {
                let matte = capture(&mut self.host, request, PassKind::Matte).await?;
                alpha_matte(color, matte, mode)?
            }
        };

        let scaled = downscale(combined, request.width, request.height, request.supersampling)?;
        log::info!(
            "captured {}x{} ({:?})",
            scaled.width(),
            scaled.height(),
            request.transparency
        );

        Ok(match request.transparency {
            TransparencyMode::None => scaled.into_rgb(),
            _ => scaled,
        })
    }

    async fn run_stereo(
        &mut self,
        request: &CaptureRequest,
        stereo: StereoParams,
    ) -> Result<PixelBuffer> {
        let pose = self
            .host
            .camera_pose()
            .ok_or(CaptureError::NoCaptureSource)?;

        // Stereo pairs are opaque color captures of each eye.
        let mono = CaptureRequest {
            stereo: None,
            transparency: TransparencyMode::None,
            ..request.clone()
        };

        let offset = pose.right * (stereo.eye_separation / 2.0);

        // The scope pins the camera: whatever happens below, the position
        // is restored before control returns.
        let mut scope = RenderStateScope::apply(&mut self.host, StateOverrides::hold());

        scope.host().set_camera_position(pose.position - offset);
        let left_eye = capture(scope.host(), &mono, PassKind::Color).await?;

        scope.host().set_camera_position(pose.position + offset);
        let right_eye = capture(scope.host(), &mono, PassKind::Color).await?;

        drop(scope);

        let left_eye = downscale(left_eye, mono.width, mono.height, mono.supersampling)?;
        let right_eye = downscale(right_eye, mono.width, mono.height, mono.supersampling)?;

        let pair = stitch(
            left_eye,
            right_eye,
            stereo.overlap_fraction,
            stereo.flip_eyes,
        )?;
        log::info!("captured stereo pair {}x{}", pair.width(), pair.height());
        Ok(pair.into_rgb())
    }

    async fn run_stereo_panorama<P: PanoramaSource>(
        &mut self,
        source: &mut P,
        resolution: u32,
        stereo: StereoParams,
    ) -> Result<PixelBuffer> {
        let pose = self
            .host
            .camera_pose()
            .ok_or(CaptureError::NoCaptureSource)?;
        let offset = pose.right * (stereo.eye_separation / 2.0);

        let mut scope = RenderStateScope::apply(&mut self.host, StateOverrides::hold());

        scope.host().set_camera_position(pose.position - offset);
        scope.host().end_of_frame().await;
        let left_eye = source.capture_panorama(resolution).await?;

        scope.host().set_camera_position(pose.position + offset);
        scope.host().end_of_frame().await;
        let right_eye = source.capture_panorama(resolution).await?;

        drop(scope);

        // No trim at the wrap-around seam.
        let pair = stitch(left_eye, right_eye, 0.0, stereo.flip_eyes)?;
        log::info!(
            "captured stereo panorama {}x{}",
            pair.width(),
            pair.height()
        );
        Ok(pair)
    }
}
