//! Scenario Tests for the Assembled Sidekick
//!
//! These tests drive [`Sidekick`] the way a surface does: one `tick` per
//! display frame with an explicit frame delta. Time is virtual, so nothing
//! here sleeps, and randomness is seeded or scripted.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use sidekick_core::expression::EYE_CLOSED;
use sidekick_core::particles::SPAWN_RULES;
use sidekick_core::{
    Action, AppearanceConfig, ExpressionController, ExpressionEvent, FrameInput, FrameSnapshot,
    ParticleKind, RandomSource, RecordingSurface, ScriptedRandom, SeededRandom, Sidekick,
    VariantKey,
};

// =============================================================================
// Harness
// =============================================================================

const FRAME_60HZ: Duration = Duration::from_micros(16_667);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn sidekick(rng: impl RandomSource + 'static) -> Sidekick<RecordingSurface> {
    Sidekick::new(Action::Idle, RecordingSurface::default(), Box::new(rng))
}

fn frame(
    sidekick: &mut Sidekick<RecordingSurface>,
    action: Action,
    delta: Duration,
) -> FrameSnapshot {
    sidekick
        .tick(&FrameInput::new(action, delta))
        .expect("sidekick is running")
}

/// Sidekick whose completion callback records every fired action
fn recording_sidekick(
    rng: impl RandomSource + 'static,
) -> (Sidekick<RecordingSurface>, Rc<RefCell<Vec<Action>>>) {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let sidekick =
        sidekick(rng).on_action_complete(move |action| sink.borrow_mut().push(action));
    (sidekick, fired)
}

// =============================================================================
// Transition Scenarios
// =============================================================================

#[test]
fn test_every_change_opens_exact_window_then_commits() {
    for to in Action::ALL.into_iter().filter(|a| *a != Action::Idle) {
        let mut sidekick = sidekick(ScriptedRandom::constant(0.5));
        frame(&mut sidekick, Action::Idle, ms(1));

        let first = frame(&mut sidekick, to, ms(1));
        assert!(first.state.is_transitioning, "{to} did not start a transition");

        // 149 ms later the window is still open
        let open = frame(&mut sidekick, to, ms(149));
        assert!(open.state.is_transitioning);

        let closed = frame(&mut sidekick, to, ms(1));
        assert!(!closed.state.is_transitioning);
        assert_eq!(sidekick.controller().committed_action(), to);
    }
}

#[test]
fn test_idle_nod_idle_inside_window_stays_transitioning() {
    let mut sidekick = sidekick(ScriptedRandom::constant(0.5));
    frame(&mut sidekick, Action::Idle, ms(1));

    let mut timeline = Vec::new();
    for _ in 0..50 {
        timeline.push(frame(&mut sidekick, Action::Nod, ms(1)).state.is_transitioning);
    }
    for _ in 0..149 {
        timeline.push(frame(&mut sidekick, Action::Idle, ms(1)).state.is_transitioning);
    }
    assert!(timeline.iter().all(|t| *t), "window dropped before restart elapsed");

    // second change landed at 52 ms, so the window closes at 202 ms
    let after = frame(&mut sidekick, Action::Idle, ms(2));
    assert!(!after.state.is_transitioning);
    assert_eq!(sidekick.controller().committed_action(), Action::Idle);
}

#[test]
fn test_transition_closes_both_eyes() {
    let mut sidekick = sidekick(ScriptedRandom::constant(0.5));
    let snapshot = frame(&mut sidekick, Action::Confused, ms(5));
    assert!((snapshot.left_eye.openness - EYE_CLOSED).abs() < f32::EPSILON);
    assert!((snapshot.right_eye.openness - EYE_CLOSED).abs() < f32::EPSILON);
    assert!(!snapshot.face.eye_highlights);
    assert_eq!(sidekick.controller().effective_eye_base_key(), VariantKey::Transition);
}

#[test]
fn test_confused_eyes_diverge_after_commit() {
    let mut sidekick = sidekick(ScriptedRandom::constant(0.5));
    frame(&mut sidekick, Action::Confused, ms(1));
    let mut last = frame(&mut sidekick, Action::Confused, ms(200));
    for _ in 0..60 {
        last = frame(&mut sidekick, Action::Confused, ms(16));
    }
    assert!(last.left_eye.pose.scale_y < 0.6);
    assert!(last.right_eye.pose.scale_y > 1.1);
    assert!(last.left_eye.pose.y < 0.0 && last.right_eye.pose.y > 0.0);
}

// =============================================================================
// Fidget Scenarios
// =============================================================================

#[test]
fn test_fidgets_follow_schedule_over_long_idle() {
    let mut rng = SeededRandom::new(2024);
    let mut controller = ExpressionController::new(Action::Idle);
    let mut events = Vec::new();
    for _ in 0..120_000 {
        events.extend(controller.tick(Action::Idle, ms(1), &mut rng));
        let state = controller.state();
        assert!(!(state.is_transitioning && state.active_fidget.is_some()));
    }

    let starts: Vec<Duration> = events
        .iter()
        .filter_map(|e| match e {
            ExpressionEvent::FidgetStarted { at, .. } => Some(*at),
            _ => None,
        })
        .collect();
    let ends: Vec<Duration> = events
        .iter()
        .filter_map(|e| match e {
            ExpressionEvent::FidgetEnded { at, .. } => Some(*at),
            _ => None,
        })
        .collect();

    assert!(starts.len() > 10);
    assert_eq!(starts[0], ms(3000));
    for (start, end) in starts.iter().zip(&ends) {
        assert_eq!(*end - *start, ms(2000));
    }
    for pair in starts.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= ms(3000) && gap < ms(7000), "gap {gap:?}");
    }
}

#[test]
fn test_leaving_idle_mid_fidget_clears_it() {
    let mut sidekick = sidekick(ScriptedRandom::constant(0.5));
    let mut snapshot = frame(&mut sidekick, Action::Idle, ms(3001));
    assert!(snapshot.state.active_fidget.is_some());

    snapshot = frame(&mut sidekick, Action::Happy, ms(1));
    assert_eq!(snapshot.state.active_fidget, None);

    // back to idle: first fidget again waits the initial delay after commit
    frame(&mut sidekick, Action::Idle, ms(1));
    snapshot = frame(&mut sidekick, Action::Idle, ms(3100));
    assert_eq!(snapshot.state.active_fidget, None);
    snapshot = frame(&mut sidekick, Action::Idle, ms(100));
    assert!(snapshot.state.active_fidget.is_some());
}

// =============================================================================
// Completion Scenarios
// =============================================================================

#[test]
fn test_transient_actions_complete_once_at_hold() {
    for action in [Action::Nod, Action::Happy, Action::Surprised] {
        let (mut sidekick, fired) = recording_sidekick(ScriptedRandom::constant(0.5));
        frame(&mut sidekick, action, ms(10));

        frame(&mut sidekick, action, ms(2499));
        assert!(fired.borrow().is_empty(), "{action} completed early");

        frame(&mut sidekick, action, ms(1));
        assert_eq!(*fired.borrow(), vec![action]);

        for _ in 0..100 {
            frame(&mut sidekick, action, ms(100));
        }
        assert_eq!(fired.borrow().len(), 1);
    }
}

#[test]
fn test_superseded_action_never_completes() {
    let (mut sidekick, fired) = recording_sidekick(ScriptedRandom::constant(0.5));
    frame(&mut sidekick, Action::Nod, ms(10));
    frame(&mut sidekick, Action::Happy, ms(2000));
    frame(&mut sidekick, Action::Happy, ms(2499));
    assert!(fired.borrow().is_empty());
    frame(&mut sidekick, Action::Happy, ms(1));
    assert_eq!(*fired.borrow(), vec![Action::Happy]);
}

#[test]
fn test_persistent_actions_never_complete() {
    for action in Action::PERSISTENT {
        let (mut sidekick, fired) = recording_sidekick(SeededRandom::new(5));
        for _ in 0..600 {
            frame(&mut sidekick, action, ms(50));
        }
        assert!(fired.borrow().is_empty(), "{action} signalled completion");
    }
}

// =============================================================================
// Particle Scenarios
// =============================================================================

#[test]
fn test_happy_confetti_converges_under_cap() {
    // gate passes on the first tick, then a seeded stream takes over
    let mut script = vec![0.0; 40];
    script.extend((0..10_000).map(|i| ((i * 7919) % 1000) as f32 / 1000.0));
    let mut sidekick = sidekick(ScriptedRandom::new(script));

    let mut first_nonzero = None;
    let mut peak = 0;
    for tick in 0..60 {
        frame(&mut sidekick, Action::Happy, FRAME_60HZ);
        let count = sidekick.particles().count_of(ParticleKind::Confetti);
        assert!(count <= 50);
        peak = peak.max(count);
        if count > 0 && first_nonzero.is_none() {
            first_nonzero = Some(tick);
        }
    }
    assert!(first_nonzero.is_some_and(|t| t < 5));
    assert!(peak > 5);
}

#[test]
fn test_pool_caps_hold_for_every_emitting_action() {
    for rule in &SPAWN_RULES {
        let mut sidekick = sidekick(SeededRandom::new(99));
        for _ in 0..1200 {
            frame(&mut sidekick, rule.action, FRAME_60HZ);
            assert!(sidekick.particles().count_of(rule.kind) <= rule.cap);
        }
    }
}

#[test]
fn test_no_dead_particle_is_drawn() {
    let mut sidekick = sidekick(SeededRandom::new(17));
    for action in [Action::Sad, Action::Idea, Action::Love, Action::Angry] {
        for _ in 0..300 {
            frame(&mut sidekick, action, FRAME_60HZ);
            let surface = sidekick.surface();
            assert_eq!(surface.fills.len(), sidekick.particles().len());
            assert!(surface.fills.iter().all(|(_, paint)| paint.alpha > 0.0));
        }
    }
}

#[test]
fn test_rain_never_survives_below_floor() {
    let mut sidekick = sidekick(SeededRandom::new(8));
    for _ in 0..600 {
        frame(&mut sidekick, Action::Sad, FRAME_60HZ);
        assert!(sidekick
            .particles()
            .particles()
            .iter()
            .filter(|p| p.kind == ParticleKind::Rain)
            .all(|p| p.y <= sidekick_core::particles::RAIN_FLOOR_Y));
    }
}

// =============================================================================
// Appearance Scenarios
// =============================================================================

#[test]
fn test_audio_reactive_half_volume_scales_body() {
    let mut sidekick = sidekick(ScriptedRandom::constant(0.5));
    let appearance = AppearanceConfig::default().with_audio_reactive(true);
    let snapshot = sidekick
        .tick(
            &FrameInput::new(Action::Idle, FRAME_60HZ)
                .with_appearance(appearance)
                .with_volume(0.5),
        )
        .expect("running");
    assert!((snapshot.audio_scale - 1.10).abs() < 1e-6);

    let muted = sidekick
        .tick(&FrameInput::new(Action::Idle, FRAME_60HZ).with_volume(0.5))
        .expect("running");
    assert!((muted.audio_scale - 1.0).abs() < f32::EPSILON);
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_teardown_stops_timers_and_particles() {
    let (mut sidekick, fired) = recording_sidekick(ScriptedRandom::constant(0.0));
    frame(&mut sidekick, Action::Happy, ms(200));
    assert!(!sidekick.particles().is_empty());

    sidekick.shutdown();
    assert!(!sidekick.controller().has_pending_timers());
    assert!(sidekick.particles().is_empty());
    assert!(sidekick.tick(&FrameInput::new(Action::Happy, ms(5000))).is_none());
    assert!(fired.borrow().is_empty());
}
