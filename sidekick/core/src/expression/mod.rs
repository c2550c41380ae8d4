//! Expression Controller
//!
//! Owns the four concurrently running timers that give the sidekick its
//! life (anticipation transition, idle fidget, blink, auto-reset) and
//! derives the effective motion keys for each layer on every tick.
//!
//! # Timers
//!
//! ```text
//! Transition  150 ms window on every action change; re-arming restarts it
//! Fidget      IDLE only: first after 3 s, hold 2 s, next after 3-7 s
//! Blink       free-running: first after 3 s, then every 2-6 s, 200 ms pulse
//! AutoReset   2.5 s after a non-persistent action becomes current
//! ```
//!
//! Time is virtual: each [`ExpressionController::tick`] receives the elapsed
//! [`Duration`] and fires due timers in deadline order, so behavior is
//! independent of the caller's frame rate and tests never sleep.
//!
//! # Invariants
//!
//! - A fidget is only active while the action is IDLE and no transition is
//!   in progress.
//! - Every action change cancels the pending auto-reset before scheduling a
//!   new one, so a superseded action never signals completion.
//! - Effective keys are derived on demand, never stored.

pub mod eyes;
pub mod face;
mod timers;

pub use eyes::{eye_tint, resolve_eye, EyeContext, EyeSide, EyeTarget, EYE_CLOSED, EYE_OPEN};
pub use face::{cheek_blush, mouth_for, AntennaPose, FaceFeatures, Mouth};
pub use timers::Timer;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::animation::VariantKey;
use crate::random::RandomSource;
use timers::{TimerKind, Timers};

/// Anticipation window opened by every action change
pub const TRANSITION_WINDOW: Duration = Duration::from_millis(150);

/// Delay before the first fidget after settling into IDLE
pub const FIDGET_INITIAL_DELAY: Duration = Duration::from_millis(3000);

/// How long a fidget stays active
pub const FIDGET_HOLD: Duration = Duration::from_millis(2000);

/// Bounds (ms) of the delay between fidgets, measured from the previous fire
///
/// The hold eats into this delay, so the quiet gap after a fidget ends is
/// 1000-5000 ms.
pub const FIDGET_INTERVAL_MS: (f32, f32) = (3000.0, 7000.0);

/// Delay before the first blink
pub const BLINK_INITIAL_DELAY: Duration = Duration::from_millis(3000);

/// Bounds (ms) of the delay between blinks
pub const BLINK_INTERVAL_MS: (f32, f32) = (2000.0, 6000.0);

/// Length of a blink pulse
pub const BLINK_PULSE: Duration = Duration::from_millis(200);

/// Hold before a non-persistent action signals completion
pub const AUTO_RESET_HOLD: Duration = Duration::from_millis(2500);

/// Short randomized idle motion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fidget {
    /// Side-to-side rock
    Wiggle,
    /// Eyes look left then right
    Glance,
    /// Small hop
    Bounce,
}

impl Fidget {
    /// Every fidget, in selection order
    pub const ALL: [Fidget; 3] = [Fidget::Wiggle, Fidget::Glance, Fidget::Bounce];

    /// Motion table key for this fidget
    #[must_use]
    pub const fn key(self) -> VariantKey {
        match self {
            Self::Wiggle => VariantKey::FidgetWiggle,
            Self::Glance => VariantKey::FidgetGlance,
            Self::Bounce => VariantKey::FidgetBounce,
        }
    }
}

/// Derived, read-only transition state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionState {
    /// Anticipation window is open
    pub is_transitioning: bool,
    /// Blink pulse is active
    pub is_blinking: bool,
    /// Active idle fidget
    pub active_fidget: Option<Fidget>,
}

/// Something that happened while advancing the clock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionEvent {
    /// An action change opened (or restarted) the anticipation window
    TransitionStarted {
        /// Previously observed action
        from: Action,
        /// Newly observed action
        to: Action,
        /// Clock time
        at: Duration,
    },
    /// The anticipation window closed and the action was committed
    TransitionCommitted {
        /// Committed action
        action: Action,
        /// Clock time
        at: Duration,
    },
    /// A fidget began
    FidgetStarted {
        /// Chosen fidget
        fidget: Fidget,
        /// Clock time
        at: Duration,
    },
    /// A fidget ended or was cancelled
    FidgetEnded {
        /// Fidget that ended
        fidget: Fidget,
        /// Clock time
        at: Duration,
    },
    /// A visible blink began
    BlinkStarted {
        /// Clock time
        at: Duration,
    },
    /// A visible blink ended
    BlinkEnded {
        /// Clock time
        at: Duration,
    },
    /// A non-persistent action finished its hold
    ActionComplete {
        /// Action that completed
        action: Action,
        /// Clock time
        at: Duration,
    },
}

/// Orchestrates transition, fidget, blink and auto-reset timing
#[derive(Debug, Clone)]
pub struct ExpressionController {
    now: Duration,
    observed: Action,
    committed: Action,
    action_changed_at: Duration,
    transitioning: bool,
    blinking: bool,
    fidget: Option<Fidget>,
    fidget_started_at: Duration,
    timers: Timers,
    shut_down: bool,
}

impl ExpressionController {
    /// Create a controller showing `initial`, with the clock at zero
    ///
    /// The blink timer starts immediately; the fidget timer starts when
    /// `initial` is IDLE; a non-persistent `initial` schedules completion.
    #[must_use]
    pub fn new(initial: Action) -> Self {
        let mut controller = Self {
            now: Duration::ZERO,
            observed: initial,
            committed: initial,
            action_changed_at: Duration::ZERO,
            transitioning: false,
            blinking: false,
            fidget: None,
            fidget_started_at: Duration::ZERO,
            timers: Timers::default(),
            shut_down: false,
        };
        controller.timers.blink.arm(Duration::ZERO, BLINK_INITIAL_DELAY);
        controller.schedule_fidget();
        controller.schedule_auto_reset();
        controller
    }

    /// Advance the clock by `delta`, then observe `action`
    ///
    /// Timers due within `delta` fire in deadline order, each seeing the
    /// clock at its own deadline. An action different from the last observed
    /// one is then treated as a change at the new clock time.
    pub fn tick(
        &mut self,
        action: Action,
        delta: Duration,
        rng: &mut dyn RandomSource,
    ) -> Vec<ExpressionEvent> {
        let mut events = Vec::new();
        if self.shut_down {
            return events;
        }

        self.advance(delta, rng, &mut events);
        self.observe(action, &mut events);
        events
    }

    /// Advance the clock without observing a new action
    pub fn advance(
        &mut self,
        delta: Duration,
        rng: &mut dyn RandomSource,
        events: &mut Vec<ExpressionEvent>,
    ) {
        if self.shut_down {
            return;
        }
        let target = self.now + delta;
        while let Some((kind, at)) = self.timers.pop_due(target) {
            self.now = at;
            self.fire(kind, rng, events);
        }
        self.now = target;
    }

    /// Observe the current action at the current clock time
    pub fn observe(&mut self, action: Action, events: &mut Vec<ExpressionEvent>) {
        if self.shut_down || action == self.observed {
            return;
        }

        let from = self.observed;
        tracing::debug!(%from, to = %action, at_ms = self.now.as_millis(), "Action changed");

        self.observed = action;
        self.action_changed_at = self.now;

        self.transitioning = true;
        self.timers.transition.arm(self.now, TRANSITION_WINDOW);
        events.push(ExpressionEvent::TransitionStarted {
            from,
            to: action,
            at: self.now,
        });

        self.cancel_fidget(events);
        self.schedule_auto_reset();
    }

    /// Cancel every timer; later ticks are no-ops
    pub fn shutdown(&mut self) {
        tracing::debug!("Expression controller shut down");
        self.timers.cancel_all();
        self.transitioning = false;
        self.blinking = false;
        self.fidget = None;
        self.shut_down = true;
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Whether any timer is still pending
    #[must_use]
    pub fn has_pending_timers(&self) -> bool {
        self.timers.any_armed()
    }

    /// Virtual clock time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Most recently observed action
    #[must_use]
    pub fn action(&self) -> Action {
        self.observed
    }

    /// Action committed when the last transition window closed
    #[must_use]
    pub fn committed_action(&self) -> Action {
        self.committed
    }

    /// Clock time of the last action change
    #[must_use]
    pub fn action_changed_at(&self) -> Duration {
        self.action_changed_at
    }

    /// How long the active fidget has been running
    #[must_use]
    pub fn fidget_elapsed(&self) -> Option<Duration> {
        self.fidget
            .map(|_| self.now.saturating_sub(self.fidget_started_at))
    }

    /// Current transition state
    #[must_use]
    pub fn state(&self) -> TransitionState {
        TransitionState {
            is_transitioning: self.transitioning,
            is_blinking: self.blinking,
            active_fidget: self.fidget,
        }
    }

    /// Inputs for the eye rules
    #[must_use]
    pub fn eye_context(&self) -> EyeContext {
        EyeContext {
            action: self.observed,
            transitioning: self.transitioning,
            blinking: self.blinking,
            fidget: self.fidget,
        }
    }

    /// Effective body key
    ///
    /// TRANSITION while transitioning, else the fidget while idle, else the
    /// action itself.
    #[must_use]
    pub fn effective_body_key(&self) -> VariantKey {
        if self.transitioning {
            return VariantKey::Transition;
        }
        match self.fidget {
            Some(fidget) if self.observed == Action::Idle => fidget.key(),
            _ => VariantKey::Action(self.observed),
        }
    }

    /// Effective eye key before per-side overrides
    ///
    /// TRANSITION while transitioning, blinking or sleepy, else the glance
    /// fidget while idle, else the action itself.
    #[must_use]
    pub fn effective_eye_base_key(&self) -> VariantKey {
        if self.transitioning || self.blinking || self.observed == Action::Sleepy {
            return VariantKey::Transition;
        }
        match self.fidget {
            Some(Fidget::Glance) if self.observed == Action::Idle => VariantKey::FidgetGlance,
            _ => VariantKey::Action(self.observed),
        }
    }

    /// Resolved target for one eye
    #[must_use]
    pub fn eye_target(&self, side: EyeSide) -> EyeTarget {
        resolve_eye(&self.eye_context(), self.effective_eye_base_key(), side)
    }

    /// Face features at the current clock time
    #[must_use]
    pub fn face(&self) -> FaceFeatures {
        let action_secs = self.now.saturating_sub(self.action_changed_at).as_secs_f32();
        let fidget_secs = self.fidget_elapsed().map(|d| d.as_secs_f32());
        FaceFeatures::derive(&self.eye_context(), action_secs, fidget_secs)
    }

    fn fire(&mut self, kind: TimerKind, rng: &mut dyn RandomSource, events: &mut Vec<ExpressionEvent>) {
        match kind {
            TimerKind::Transition => {
                self.transitioning = false;
                self.committed = self.observed;
                tracing::debug!(action = %self.committed, "Transition committed");
                events.push(ExpressionEvent::TransitionCommitted {
                    action: self.committed,
                    at: self.now,
                });
                self.schedule_fidget();
            }
            TimerKind::FidgetStart => {
                if !self.fidget_allowed() {
                    return;
                }
                let fidget = Fidget::ALL[rng.pick_index(Fidget::ALL.len())];
                tracing::debug!(?fidget, "Fidget started");
                self.fidget = Some(fidget);
                self.fidget_started_at = self.now;
                self.timers.fidget_end.arm(self.now, FIDGET_HOLD);
                let (min, max) = FIDGET_INTERVAL_MS;
                self.timers
                    .fidget_start
                    .arm(self.now, millis(rng.range(min, max)));
                events.push(ExpressionEvent::FidgetStarted {
                    fidget,
                    at: self.now,
                });
            }
            TimerKind::FidgetEnd => {
                if let Some(fidget) = self.fidget.take() {
                    events.push(ExpressionEvent::FidgetEnded {
                        fidget,
                        at: self.now,
                    });
                }
            }
            TimerKind::Blink => {
                let (min, max) = BLINK_INTERVAL_MS;
                self.timers.blink.arm(self.now, millis(rng.range(min, max)));
                if matches!(self.observed, Action::Idle | Action::Waiting) {
                    self.blinking = true;
                    self.timers.blink_end.arm(self.now, BLINK_PULSE);
                    events.push(ExpressionEvent::BlinkStarted { at: self.now });
                }
            }
            TimerKind::BlinkEnd => {
                self.blinking = false;
                events.push(ExpressionEvent::BlinkEnded { at: self.now });
            }
            TimerKind::AutoReset => {
                tracing::debug!(action = %self.observed, "Action complete");
                events.push(ExpressionEvent::ActionComplete {
                    action: self.observed,
                    at: self.now,
                });
            }
        }
    }

    fn fidget_allowed(&self) -> bool {
        self.observed == Action::Idle && !self.transitioning
    }

    fn schedule_fidget(&mut self) {
        if self.fidget_allowed() && !self.timers.fidget_start.is_armed() {
            self.timers.fidget_start.arm(self.now, FIDGET_INITIAL_DELAY);
        }
    }

    fn cancel_fidget(&mut self, events: &mut Vec<ExpressionEvent>) {
        self.timers.fidget_start.cancel();
        self.timers.fidget_end.cancel();
        if let Some(fidget) = self.fidget.take() {
            tracing::debug!(?fidget, "Fidget cancelled");
            events.push(ExpressionEvent::FidgetEnded {
                fidget,
                at: self.now,
            });
        }
    }

    fn schedule_auto_reset(&mut self) {
        if self.observed.is_persistent() {
            self.timers.auto_reset.cancel();
        } else {
            self.timers.auto_reset.arm(self.now, AUTO_RESET_HOLD);
        }
    }
}

impl Default for ExpressionController {
    fn default() -> Self {
        Self::new(Action::Idle)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis(ms: f32) -> Duration {
    Duration::from_millis(ms.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Tick in 1 ms steps, collecting events
    fn run(
        c: &mut ExpressionController,
        action: Action,
        total_ms: u64,
        rng: &mut dyn RandomSource,
    ) -> Vec<ExpressionEvent> {
        let mut events = Vec::new();
        for _ in 0..total_ms {
            events.extend(c.tick(action, ms(1), rng));
        }
        events
    }

    fn completions(events: &[ExpressionEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, ExpressionEvent::ActionComplete { .. }))
            .count()
    }

    #[test]
    fn test_transition_window_is_exact() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);

        c.tick(Action::Nod, ms(10), &mut rng);
        assert!(c.state().is_transitioning);
        assert_eq!(c.effective_body_key(), VariantKey::Transition);
        assert_eq!(c.committed_action(), Action::Idle);

        c.tick(Action::Nod, ms(149), &mut rng);
        assert!(c.state().is_transitioning);

        let events = c.tick(Action::Nod, ms(1), &mut rng);
        assert!(!c.state().is_transitioning);
        assert_eq!(c.committed_action(), Action::Nod);
        assert_eq!(
            events,
            vec![ExpressionEvent::TransitionCommitted {
                action: Action::Nod,
                at: ms(160)
            }]
        );
        assert_eq!(c.effective_body_key(), VariantKey::Action(Action::Nod));
    }

    #[test]
    fn test_rapid_changes_restart_window() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);

        c.tick(Action::Nod, ms(0), &mut rng);
        for _ in 0..50 {
            c.tick(Action::Nod, ms(1), &mut rng);
            assert!(c.state().is_transitioning);
        }
        c.tick(Action::Idle, ms(50), &mut rng);
        for _ in 0..149 {
            c.tick(Action::Idle, ms(1), &mut rng);
            assert!(c.state().is_transitioning);
        }
        c.tick(Action::Idle, ms(1), &mut rng);
        assert!(!c.state().is_transitioning);
        assert_eq!(c.committed_action(), Action::Idle);
    }

    #[test]
    fn test_first_fidget_after_initial_delay() {
        let mut rng = ScriptedRandom::new(vec![0.5]);
        let mut c = ExpressionController::new(Action::Idle);

        run(&mut c, Action::Idle, 2999, &mut rng);
        assert_eq!(c.state().active_fidget, None);

        c.tick(Action::Idle, ms(1), &mut rng);
        assert_eq!(c.state().active_fidget, Some(Fidget::Glance));
        assert_eq!(c.effective_body_key(), VariantKey::FidgetGlance);

        // The first blink lands on the same instant and wins the eyes
        assert!(c.state().is_blinking);
        assert_eq!(c.effective_eye_base_key(), VariantKey::Transition);
        c.tick(Action::Idle, BLINK_PULSE, &mut rng);
        assert_eq!(c.effective_eye_base_key(), VariantKey::FidgetGlance);
    }

    #[test]
    fn test_fidget_holds_for_exactly_two_seconds() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Idle, ms(3000), &mut rng);
        assert_eq!(c.state().active_fidget, Some(Fidget::Wiggle));

        c.tick(Action::Idle, ms(1999), &mut rng);
        assert_eq!(c.state().active_fidget, Some(Fidget::Wiggle));
        let events = c.tick(Action::Idle, ms(1), &mut rng);
        assert_eq!(c.state().active_fidget, None);
        assert!(events.contains(&ExpressionEvent::FidgetEnded {
            fidget: Fidget::Wiggle,
            at: ms(5000)
        }));
    }

    #[test]
    fn test_next_fidget_interval_from_firing() {
        // 0.0 picks Wiggle and the shortest gap (3000 ms)
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let mut c = ExpressionController::new(Action::Idle);
        let events = run(&mut c, Action::Idle, 9000, &mut rng);
        let starts: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ExpressionEvent::FidgetStarted { at, .. } => Some(*at),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![ms(3000), ms(6000), ms(9000)]);
    }

    #[test]
    fn test_quiet_gap_after_fidget_ends() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let mut c = ExpressionController::new(Action::Idle);
        let events = run(&mut c, Action::Idle, 6000, &mut rng);
        let ended = events.iter().find_map(|e| match e {
            ExpressionEvent::FidgetEnded { at, .. } => Some(*at),
            _ => None,
        });
        let restarted = events.iter().rev().find_map(|e| match e {
            ExpressionEvent::FidgetStarted { at, .. } => Some(*at),
            _ => None,
        });
        assert_eq!(ended, Some(ms(5000)));
        assert_eq!(restarted, Some(ms(6000)));
    }

    #[test]
    fn test_leaving_idle_cancels_fidget() {
        let mut rng = ScriptedRandom::new(vec![0.9]);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Idle, ms(3500), &mut rng);
        assert_eq!(c.state().active_fidget, Some(Fidget::Bounce));

        let events = c.tick(Action::Happy, ms(1), &mut rng);
        assert_eq!(c.state().active_fidget, None);
        assert!(events.iter().any(|e| matches!(
            e,
            ExpressionEvent::FidgetEnded {
                fidget: Fidget::Bounce,
                ..
            }
        )));

        // Nothing fidget-related fires later
        let later = run(&mut c, Action::Happy, 6000, &mut rng);
        assert!(!later
            .iter()
            .any(|e| matches!(e, ExpressionEvent::FidgetStarted { .. })));
    }

    #[test]
    fn test_leaving_idle_without_fidget_is_quiet() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);
        let events = c.tick(Action::Sad, ms(100), &mut rng);
        assert!(!events
            .iter()
            .any(|e| matches!(e, ExpressionEvent::FidgetEnded { .. })));
    }

    #[test]
    fn test_fidget_never_overlaps_transition() {
        let mut rng = ScriptedRandom::new(vec![0.2, 0.7, 0.4]);
        let mut c = ExpressionController::new(Action::Idle);
        let script = [
            (Action::Idle, 4000),
            (Action::Nod, 300),
            (Action::Idle, 8000),
            (Action::Happy, 100),
            (Action::Idle, 6000),
        ];
        for (action, span) in script {
            for _ in 0..span {
                c.tick(action, ms(1), &mut rng);
                let state = c.state();
                assert!(!(state.is_transitioning && state.active_fidget.is_some()));
                if state.active_fidget.is_some() {
                    assert_eq!(c.action(), Action::Idle);
                }
            }
        }
    }

    #[test]
    fn test_blink_only_visible_when_idle_or_waiting() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut c = ExpressionController::new(Action::Waiting);
        c.tick(Action::Waiting, ms(3000), &mut rng);
        assert!(c.state().is_blinking);
        assert_eq!(c.effective_eye_base_key(), VariantKey::Transition);
        c.tick(Action::Waiting, ms(200), &mut rng);
        assert!(!c.state().is_blinking);

        let mut c = ExpressionController::new(Action::Thinking);
        let events = c.tick(Action::Thinking, ms(3000), &mut rng);
        assert!(!c.state().is_blinking);
        assert!(events.is_empty());
        // Rescheduled regardless
        c.tick(Action::Thinking, ms(2000), &mut rng);
        assert!(c.has_pending_timers());
    }

    #[test]
    fn test_blink_free_runs_across_action_changes() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Idle, ms(2900), &mut rng);
        c.tick(Action::Waiting, ms(0), &mut rng);
        // Blink deadline unchanged by the action change
        let events = c.tick(Action::Waiting, ms(200), &mut rng);
        assert!(events.contains(&ExpressionEvent::BlinkStarted { at: ms(3000) }));
    }

    #[test]
    fn test_non_persistent_completes_once() {
        let mut rng = ScriptedRandom::constant(0.5);
        for action in [Action::Nod, Action::Happy, Action::Surprised] {
            let mut c = ExpressionController::new(Action::Idle);
            c.tick(action, ms(0), &mut rng);
            let before = run(&mut c, action, 2499, &mut rng);
            assert_eq!(completions(&before), 0);
            let at = run(&mut c, action, 1, &mut rng);
            assert_eq!(
                at.last(),
                Some(&ExpressionEvent::ActionComplete {
                    action,
                    at: ms(2500)
                })
            );
            let after = run(&mut c, action, 10_000, &mut rng);
            assert_eq!(completions(&after), 0, "{action} completed twice");
        }
    }

    #[test]
    fn test_superseded_action_never_completes() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Nod, ms(0), &mut rng);
        let mut events = run(&mut c, Action::Nod, 2000, &mut rng);
        events.extend(c.tick(Action::Happy, ms(0), &mut rng));
        events.extend(run(&mut c, Action::Happy, 2499, &mut rng));
        assert_eq!(completions(&events), 0);

        let done = run(&mut c, Action::Happy, 1, &mut rng);
        assert_eq!(
            done,
            vec![ExpressionEvent::ActionComplete {
                action: Action::Happy,
                at: ms(4500)
            }]
        );
    }

    #[test]
    fn test_persistent_never_completes() {
        let mut rng = ScriptedRandom::constant(0.5);
        for action in Action::PERSISTENT {
            let mut c = ExpressionController::new(Action::Happy);
            c.tick(action, ms(0), &mut rng);
            let events = run(&mut c, action, 10_000, &mut rng);
            assert_eq!(completions(&events), 0, "{action} completed");
        }
    }

    #[test]
    fn test_switch_to_persistent_cancels_pending_completion() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Love, ms(0), &mut rng);
        c.tick(Action::Love, ms(1000), &mut rng);
        c.tick(Action::Sleepy, ms(0), &mut rng);
        let events = run(&mut c, Action::Sleepy, 5000, &mut rng);
        assert_eq!(completions(&events), 0);
    }

    #[test]
    fn test_sleepy_closes_eyes() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Sleepy, ms(0), &mut rng);
        c.tick(Action::Sleepy, ms(500), &mut rng);
        assert_eq!(c.effective_eye_base_key(), VariantKey::Transition);
        assert_eq!(
            c.eye_target(EyeSide::Left).key,
            VariantKey::Action(Action::Sleepy)
        );
        assert_eq!(c.effective_body_key(), VariantKey::Action(Action::Sleepy));
    }

    #[test]
    fn test_shutdown_cancels_everything() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Idle);
        c.tick(Action::Happy, ms(10), &mut rng);
        c.shutdown();
        assert!(!c.has_pending_timers());
        assert!(c.is_shut_down());

        let events = run(&mut c, Action::Idle, 5000, &mut rng);
        assert!(events.is_empty());
        assert_eq!(c.now(), ms(10));
    }

    #[test]
    fn test_initial_non_persistent_schedules_completion() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut c = ExpressionController::new(Action::Emphasis);
        let events = c.tick(Action::Emphasis, ms(2500), &mut rng);
        assert_eq!(completions(&events), 1);
    }
}
