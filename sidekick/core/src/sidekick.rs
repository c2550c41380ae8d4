//! The assembled sidekick
//!
//! [`Sidekick`] wires the expression controller, one [`LayerAnimator`] per
//! posed layer and the particle engine behind a single per-frame `tick`.
//! The surface owns the refresh loop and calls `tick` once per frame with
//! the current action, appearance and volume; the returned
//! [`FrameSnapshot`] is everything it needs to draw the layered character,
//! while particles have already been drawn onto the engine's surface.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::Action;
use crate::animation::{Layer, LayerAnimator, Pose};
use crate::appearance::{AppearanceConfig, Color};
use crate::audio::audio_scale;
use crate::expression::{
    eye_tint, EyeSide, ExpressionController, ExpressionEvent, FaceFeatures, TransitionState,
};
use crate::particles::{ParticleEngine, Surface};
use crate::random::RandomSource;

/// Callback fired when a transient action has run its course
pub type ActionCompleteHandler = Box<dyn FnMut(Action)>;

/// Inputs read on every frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Current action, owned by the external controller
    pub action: Action,
    /// Current appearance
    pub appearance: AppearanceConfig,
    /// Normalized microphone volume; ignored unless audio-reactive
    pub audio_volume: f32,
    /// Time since the previous frame
    pub delta: Duration,
}

impl FrameInput {
    /// A frame showing `action` with default appearance and no audio
    #[must_use]
    pub fn new(action: Action, delta: Duration) -> Self {
        Self {
            action,
            appearance: AppearanceConfig::default(),
            audio_volume: 0.0,
            delta,
        }
    }

    /// Replace the appearance
    #[must_use]
    pub fn with_appearance(mut self, appearance: AppearanceConfig) -> Self {
        self.appearance = appearance;
        self
    }

    /// Replace the audio volume
    #[must_use]
    pub fn with_volume(mut self, audio_volume: f32) -> Self {
        self.audio_volume = audio_volume;
        self
    }
}

/// One eye's sampled state
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyeFrame {
    /// Animated transform
    pub pose: Pose,
    /// Vertical extent, collapsed while blinking, transitioning or sleepy
    pub openness: f32,
}

/// Everything needed to draw one frame of the character
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Virtual clock time
    pub at: Duration,
    /// Action observed this frame
    pub action: Action,
    /// Transition, blink and fidget flags
    pub state: TransitionState,
    /// Body transform, before the audio scale
    pub body: Pose,
    /// Shadow transform
    pub shadow: Pose,
    /// Viewer's left eye
    pub left_eye: EyeFrame,
    /// Viewer's right eye
    pub right_eye: EyeFrame,
    /// Iris color
    pub eye_tint: Color,
    /// Body scale multiplier from the microphone
    pub audio_scale: f32,
    /// Mouth, cheeks, antenna and highlights
    pub face: FaceFeatures,
    /// Appearance the frame was computed with
    pub appearance: AppearanceConfig,
    /// Whether every layer has come to rest
    pub settled: bool,
    /// Live particles after this frame's pass
    pub particle_count: usize,
}

/// Animated companion core
pub struct Sidekick<S: Surface> {
    controller: ExpressionController,
    body: LayerAnimator,
    left_eye: LayerAnimator,
    right_eye: LayerAnimator,
    shadow: LayerAnimator,
    particles: ParticleEngine<S>,
    rng: Box<dyn RandomSource>,
    on_action_complete: Option<ActionCompleteHandler>,
}

impl<S: Surface> fmt::Debug for Sidekick<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sidekick")
            .field("controller", &self.controller)
            .field("particles", &self.particles.len())
            .field("has_completion_handler", &self.on_action_complete.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Sidekick<S> {
    /// Create a sidekick showing `initial`, drawing particles onto `surface`
    pub fn new(initial: Action, surface: S, rng: Box<dyn RandomSource>) -> Self {
        info!(action = %initial, "Sidekick created");
        Self {
            controller: ExpressionController::new(initial),
            body: LayerAnimator::new(Layer::Body),
            left_eye: LayerAnimator::new(Layer::Eye),
            right_eye: LayerAnimator::new(Layer::Eye),
            shadow: LayerAnimator::new(Layer::Shadow),
            particles: ParticleEngine::new(surface),
            rng,
            on_action_complete: None,
        }
    }

    /// Register the completion callback
    ///
    /// Fired at most once per transient action episode; the owner is
    /// expected to reset its action to IDLE.
    #[must_use]
    pub fn on_action_complete(mut self, handler: impl FnMut(Action) + 'static) -> Self {
        self.on_action_complete = Some(Box::new(handler));
        self
    }

    /// Advance one frame
    ///
    /// Returns `None` once [`shutdown`](Self::shutdown) has been called.
    pub fn tick(&mut self, input: &FrameInput) -> Option<FrameSnapshot> {
        if self.controller.is_shut_down() {
            return None;
        }

        let events = self
            .controller
            .tick(input.action, input.delta, self.rng.as_mut());
        for event in &events {
            if let ExpressionEvent::ActionComplete { action, .. } = event {
                debug!(%action, "Action complete");
                if let Some(handler) = self.on_action_complete.as_mut() {
                    handler(*action);
                }
            }
        }

        let now = self.controller.now();
        let body_key = self.controller.effective_body_key();
        self.body.set_target(body_key, &[], now);
        self.shadow.set_target(body_key, &[], now);
        let left = self.controller.eye_target(EyeSide::Left);
        let right = self.controller.eye_target(EyeSide::Right);
        self.left_eye.set_target(left.key, left.overrides, now);
        self.right_eye.set_target(right.key, right.overrides, now);

        let body = self.body.sample(now);
        let shadow = self.shadow.sample(now);
        let left_pose = self.left_eye.sample(now);
        let right_pose = self.right_eye.sample(now);

        let scale = input.appearance.effective_scale();
        self.particles
            .tick(input.action, scale, input.delta, self.rng.as_mut());

        let eyes = self.controller.eye_context();
        let openness = eyes.openness();
        let settled = [&self.body, &self.shadow, &self.left_eye, &self.right_eye]
            .iter()
            .all(|animator| animator.is_settled(now));

        Some(FrameSnapshot {
            at: now,
            action: input.action,
            state: self.controller.state(),
            body,
            shadow,
            left_eye: EyeFrame {
                pose: left_pose,
                openness,
            },
            right_eye: EyeFrame {
                pose: right_pose,
                openness,
            },
            eye_tint: eye_tint(input.action),
            audio_scale: audio_scale(&input.appearance, input.audio_volume),
            face: self.controller.face(),
            appearance: input.appearance,
            settled,
            particle_count: self.particles.len(),
        })
    }

    /// Cancel every timer and stop the particle loop
    pub fn shutdown(&mut self) {
        if self.controller.is_shut_down() {
            return;
        }
        self.controller.shutdown();
        self.particles.stop();
        info!("Sidekick shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.controller.is_shut_down()
    }

    /// The expression controller
    #[must_use]
    pub fn controller(&self) -> &ExpressionController {
        &self.controller
    }

    /// The particle engine
    #[must_use]
    pub fn particles(&self) -> &ParticleEngine<S> {
        &self.particles
    }

    /// The particle surface
    #[must_use]
    pub fn surface(&self) -> &S {
        self.particles.surface()
    }

    /// Mutable access to the particle surface
    pub fn surface_mut(&mut self) -> &mut S {
        self.particles.surface_mut()
    }
}
