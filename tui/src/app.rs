//! Main Application
//!
//! The App owns the display refresh loop and plays the external controller:
//! - Keyboard events become Actions and appearance changes
//! - Each frame feeds the current Action, appearance and volume to the core
//! - The returned snapshot is painted, particles are composited on top, and
//!   the result is rasterized with half blocks

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use sidekick_core::random::source_from_seed;
use sidekick_core::{
    Action, AppearanceConfig, FrameInput, FrameSnapshot, Sidekick, SidekickConfig, Surface,
    VolumeMeter,
};

use crate::canvas::{HalfBlock, PixelCanvas};
use crate::character::paint_character;
use crate::theme::{PARTICLE_BG, STAGE_BG};
use crate::widgets::reaction_bar::{self, command_for, Command, ReactionBar, SCALE_STEP};

/// Lines reserved for the reaction bar
const BAR_HEIGHT: u16 = 3;

/// Bins in a synthetic spectrum frame
const SPECTRUM_BINS: usize = 32;

/// Oscillator speed in radians per second
const OSCILLATOR_RATE: f32 = 5.0;

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Action currently showing; the completion callback writes it too
    action: Rc<Cell<Action>>,
    /// Appearance owned by this surface
    appearance: AppearanceConfig,
    /// Smoothed volume fed by the oscillator
    meter: VolumeMeter,
    /// Oscillator phase in radians
    phase: f32,
    /// Core, drawing particles on a transparent canvas
    sidekick: Sidekick<PixelCanvas>,
    /// Character canvas
    stage: PixelCanvas,
    /// Last snapshot from the core
    snapshot: Option<FrameSnapshot>,
    /// Target time per frame
    frame_duration: Duration,
    /// Time of last update
    last_frame: Instant,
}

impl App {
    /// Create the app from a resolved config
    pub fn new(config: &SidekickConfig) -> Self {
        let action = Rc::new(Cell::new(Action::Idle));
        let reset = Rc::clone(&action);
        let sidekick = Sidekick::new(
            Action::Idle,
            PixelCanvas::new(0, 0, PARTICLE_BG),
            source_from_seed(config.seed),
        )
        .on_action_complete(move |done| {
            if reset.get() == done {
                tracing::debug!(action = %done, "action complete, back to idle");
                reset.set(Action::Idle);
            }
        });

        Self {
            running: true,
            action,
            appearance: config.appearance,
            meter: VolumeMeter::new(),
            phase: 0.0,
            sidekick,
            stage: PixelCanvas::new(0, 0, STAGE_BG),
            snapshot: None,
            frame_duration: Duration::from_secs(1) / config.fps.max(1),
            last_frame: Instant::now(),
        }
    }

    /// Show `action` from the first frame on
    pub fn starting_with(self, action: Action) -> Self {
        self.action.set(action);
        self
    }

    /// Action currently showing
    pub fn action(&self) -> Action {
        self.action.get()
    }

    /// Current appearance
    pub fn appearance(&self) -> AppearanceConfig {
        self.appearance
    }

    /// Live particles in the last frame
    pub fn particle_count(&self) -> usize {
        self.snapshot.map_or(0, |s| s.particle_count)
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run the main loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        self.last_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Err(e)) => {
                            tracing::warn!("terminal event error: {}", e);
                        }
                        None => self.quit(),
                        _ => {}
                    }
                }

                _ = tokio::time::sleep(self.frame_duration) => {}
            }

            if !self.running {
                break;
            }

            self.update(Instant::now());
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_duration {
                tokio::time::sleep(self.frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let Some(command) = command_for(key) else {
            return;
        };
        match command {
            Command::Trigger(requested) => {
                let next = reaction_bar::toggle(self.action.get(), requested);
                tracing::debug!(action = %next, "reaction");
                self.action.set(next);
            }
            Command::Reset => self.action.set(Action::Idle),
            Command::Quit => self.quit(),
            Command::ScaleUp => {
                self.appearance = reaction_bar::step_scale(self.appearance, SCALE_STEP);
            }
            Command::ScaleDown => {
                self.appearance = reaction_bar::step_scale(self.appearance, -SCALE_STEP);
            }
            Command::CycleColor => self.appearance = reaction_bar::cycle_color(self.appearance),
            Command::ToggleAudio => {
                self.appearance = self
                    .appearance
                    .with_audio_reactive(!self.appearance.audio_reactive);
                if !self.appearance.audio_reactive {
                    self.meter.reset();
                }
            }
        }
    }

    /// Stop the loop and tear the core down
    fn quit(&mut self) {
        self.running = false;
        self.sidekick.shutdown();
    }

    /// Advance the core to `now`
    pub fn update(&mut self, now: Instant) {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        if self.appearance.audio_reactive {
            self.phase = (self.phase + OSCILLATOR_RATE * delta.as_secs_f32())
                % std::f32::consts::TAU;
            self.meter.push_frame(&synthetic_spectrum(self.phase));
        }

        let input = FrameInput::new(self.action.get(), delta)
            .with_appearance(self.appearance)
            .with_volume(self.meter.volume());
        if let Some(snapshot) = self.sidekick.tick(&input) {
            self.snapshot = Some(snapshot);
        }
    }

    /// Paint the character and composite particles at `width` x `height` pixels
    pub fn compose(&mut self, width: u32, height: u32) -> &PixelCanvas {
        self.stage.resize(width, height);
        self.sidekick.surface_mut().resize(width, height);
        self.stage.clear();
        if let Some(snapshot) = &self.snapshot {
            paint_character(&mut self.stage, snapshot);
        }
        self.stage.overlay(self.sidekick.surface());
        &self.stage
    }

    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let (stage_area, bar_area) = layout(area);
        let action = self.action.get();
        let appearance = self.appearance;
        let stage = self.compose(u32::from(stage_area.width), u32::from(stage_area.height) * 2);

        terminal.draw(|frame| {
            frame.render_widget(HalfBlock::new(stage), stage_area);
            frame.render_widget(ReactionBar::new(action, appearance), bar_area);
        })?;

        Ok(())
    }
}

/// Split the screen into a square stage and the reaction bar below it
///
/// Half blocks make two pixels per cell, so a square stage is twice as wide
/// in cells as it is tall.
pub fn layout(area: Rect) -> (Rect, Rect) {
    let bar_height = BAR_HEIGHT.min(area.height);
    let stage_rows = area.height - bar_height;
    let side_px = area.width.min(stage_rows.saturating_mul(2));
    let stage = Rect::new(
        area.x + (area.width - side_px) / 2,
        area.y + (stage_rows - side_px / 2) / 2,
        side_px,
        side_px / 2,
    );
    let bar = Rect::new(area.x, area.y + stage_rows, area.width, bar_height);
    (stage, bar)
}

/// Action named on the command line; unknown names fall back to idle
pub fn start_action(name: Option<&str>) -> Action {
    name.map_or(Action::Idle, Action::from_name_or_idle)
}

/// One frame of fake spectrum magnitudes following a slow sine
pub fn synthetic_spectrum(phase: f32) -> [u8; SPECTRUM_BINS] {
    let level = 10.0 + 80.0 * (0.5 + 0.5 * phase.sin());
    let mut frame = [0u8; SPECTRUM_BINS];
    for (i, bin) in frame.iter_mut().enumerate() {
        let tilt = 1.0 - i as f32 / SPECTRUM_BINS as f32 * 0.5;
        *bin = (level * tilt).clamp(0.0, 255.0) as u8;
    }
    frame
}
