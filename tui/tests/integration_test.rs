//! Integration Tests for the TUI Surface
//!
//! These tests drive the App through its public API the way the event loop
//! does: key presses, then `update` with explicit instants, then compose and
//! rasterize into an off-screen ratatui buffer. Nothing touches a real
//! terminal.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use sidekick_core::{Action, ColorPreset, SidekickConfig};
use sidekick_tui::app::layout;
use sidekick_tui::canvas::HalfBlock;
use sidekick_tui::theme::{to_ratatui, STAGE_BG};
use sidekick_tui::widgets::ReactionBar;
use sidekick_tui::App;

const FRAME: Duration = Duration::from_millis(16);

fn press(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)
}

fn seeded_app() -> App {
    let mut config = SidekickConfig::new();
    config.seed = Some(11);
    App::new(&config)
}

/// Run `frames` updates of one display frame each
fn run_frames(app: &mut App, start: Instant, frames: u32) -> Instant {
    let mut now = start;
    for _ in 0..frames {
        now += FRAME;
        app.update(now);
    }
    now
}

fn render_to_buffer(app: &mut App, area: Rect) -> Buffer {
    let (stage_area, bar_area) = layout(area);
    let mut buf = Buffer::empty(area);
    let action = app.action();
    let appearance = app.appearance();
    let stage = app.compose(
        u32::from(stage_area.width),
        u32::from(stage_area.height) * 2,
    );
    HalfBlock::new(stage).render(stage_area, &mut buf);
    ReactionBar::new(action, appearance).render(bar_area, &mut buf);
    buf
}

#[test]
fn test_idle_frame_renders_stage_and_bar() {
    let mut app = seeded_app();
    run_frames(&mut app, Instant::now(), 10);

    let area = Rect::new(0, 0, 120, 43);
    let buf = render_to_buffer(&mut app, area);

    // corner of the stage is background, center is character
    let (stage, bar) = layout(area);
    assert_eq!(buf[(stage.x, stage.y)].bg, to_ratatui(STAGE_BG));
    let center = (stage.x + stage.width / 2, stage.y + stage.height / 2);
    assert_ne!(buf[center].bg, to_ratatui(STAGE_BG));

    let bar_text: String = (0..area.width).map(|x| buf[(x, bar.y)].symbol()).collect();
    assert!(bar_text.starts_with("Feelings"));
}

#[test]
fn test_happy_burst_reaches_the_stage() {
    let mut app = seeded_app();
    let start = Instant::now();
    app.update(start);
    app.handle_key(press('1'));
    run_frames(&mut app, start, 60);
    assert_eq!(app.action(), Action::Happy);

    assert!(app.particle_count() > 0);
    assert!(app.particle_count() <= 50);

    // particles composite over the stage without disturbing the bar
    let area = Rect::new(0, 0, 120, 43);
    let buf = render_to_buffer(&mut app, area);
    let (_, bar) = layout(area);
    let bar_text: String = (0..area.width).map(|x| buf[(x, bar.y)].symbol()).collect();
    assert!(bar_text.contains(Action::Happy.label()));
}

#[test]
fn test_transient_reaction_returns_to_idle() {
    let mut app = seeded_app();
    let start = Instant::now();
    app.update(start);
    app.handle_key(press('x'));
    assert_eq!(app.action(), Action::Shake);

    run_frames(&mut app, start, 170);
    assert_eq!(app.action(), Action::Idle);
}

#[test]
fn test_escape_resets_and_settings_keys_apply() {
    let mut app = seeded_app();
    app.handle_key(press('8'));
    assert_eq!(app.action(), Action::Sleepy);
    app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    assert_eq!(app.action(), Action::Idle);

    app.handle_key(press('c'));
    assert_eq!(app.appearance().color, ColorPreset::Mint.color());
    app.handle_key(press('+'));
    assert!((app.appearance().scale - 1.1).abs() < 1e-6);
    app.handle_key(press('-'));
    app.handle_key(press('-'));
    assert!((app.appearance().scale - 0.9).abs() < 1e-6);
}

#[test]
fn test_quit_stops_running() {
    let mut app = seeded_app();
    assert!(app.is_running());
    app.handle_key(press('q'));
    assert!(!app.is_running());
}
