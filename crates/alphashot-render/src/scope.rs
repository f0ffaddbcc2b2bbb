//! Scoped render-state override.
//!
//! Capturing mutates shared renderer state: clear mode, backdrop
//! visibility, post-effect toggles, camera position. Instead of paired
//! save/restore calls at every site, [`RenderStateScope`] snapshots the
//! prior state on entry and reverts it on `Drop`, so restoration happens on
//! every exit path - success, early return with `?`, or failure.

use glam::Vec3;

use crate::host::{BackgroundMode, PostEffects, RenderHost, RenderState};

/// Overrides a scope applies on entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateOverrides {
    /// Replace the background clear mode.
    pub background: Option<BackgroundMode>,
    /// Hide the 2D backdrop object.
    pub hide_backdrop: bool,
    /// Disable capture-incompatible post effects.
    pub disable_post_effects: bool,
}

impl StateOverrides {
    /// No overrides; the scope only guards camera and state restoration.
    #[must_use]
    pub fn hold() -> Self {
        Self::default()
    }

    /// Overrides for a matte pass: transparent background, backdrop hidden,
    /// post effects off.
    #[must_use]
    pub fn matte() -> Self {
        Self {
            background: Some(BackgroundMode::TransparentBlack),
            hide_backdrop: true,
            disable_post_effects: true,
        }
    }

    /// Overrides for a supersampled color pass: post effects off (ambient
    /// occlusion bands when rendered oversized), everything else kept.
    #[must_use]
    pub fn supersampled_color() -> Self {
        Self {
            disable_post_effects: true,
            ..Self::default()
        }
    }
}

/// Holds the host exclusively for the duration of one override scope.
///
/// Dropping the scope restores the saved render state, the saved camera
/// position, and any disabled post effects, unconditionally.
pub struct RenderStateScope<'a, H: RenderHost + PostEffects> {
    host: &'a mut H,
    saved_state: RenderState,
    saved_camera: Option<Vec3>,
    effects_token: Option<H::Token>,
}

impl<'a, H: RenderHost + PostEffects> RenderStateScope<'a, H> {
    /// Snapshots the current state and applies `overrides`.
    pub fn apply(host: &'a mut H, overrides: StateOverrides) -> Self {
        let saved_state = host.render_state();
        let saved_camera = host.camera_pose().map(|pose| pose.position);

        let mut state = saved_state;
        if let Some(background) = overrides.background {
            state.background = background;
        }
        if overrides.hide_backdrop {
            state.backdrop_visible = false;
        }
        if state != saved_state {
            host.set_render_state(state);
        }

        let effects_token = overrides
            .disable_post_effects
            .then(|| host.disable_for_capture());

        Self {
            host,
            saved_state,
            saved_camera,
            effects_token,
        }
    }

    /// The guarded host, for issuing renders and camera moves inside the
    /// scope.
    pub fn host(&mut self) -> &mut H {
        self.host
    }
}

impl<H: RenderHost + PostEffects> Drop for RenderStateScope<'_, H> {
    fn drop(&mut self) {
        if let Some(token) = self.effects_token.take() {
            self.host.restore(token);
        }
        self.host.set_render_state(self.saved_state);
        if let Some(position) = self.saved_camera {
            self.host.set_camera_position(position);
        }
    }
}
