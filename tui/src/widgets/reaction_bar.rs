//! Reaction Bar
//!
//! Key bindings that drive the sidekick, and the widget listing them.
//! The surface is the external controller: it owns the current action and
//! the appearance, and this module turns key presses into changes to both.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use sidekick_core::appearance::{MAX_SCALE, MIN_SCALE};
use sidekick_core::{Action, AppearanceConfig, ColorPreset};

use crate::theme;

/// Scale change per `+`/`-` press
pub const SCALE_STEP: f32 = 0.1;

/// A key bound to an action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reaction {
    /// Key to press
    pub key: char,
    /// Action it triggers
    pub action: Action,
}

const fn reaction(key: char, action: Action) -> Reaction {
    Reaction { key, action }
}

/// Feelings group
pub const FEELINGS: [Reaction; 8] = [
    reaction('1', Action::Happy),
    reaction('2', Action::Love),
    reaction('3', Action::Silly),
    reaction('4', Action::Sad),
    reaction('5', Action::Angry),
    reaction('6', Action::Surprised),
    reaction('7', Action::Confused),
    reaction('8', Action::Sleepy),
];

/// Actions group
pub const ACTIONS: [Reaction; 5] = [
    reaction('n', Action::Nod),
    reaction('x', Action::Shake),
    reaction('t', Action::Thinking),
    reaction('i', Action::Idea),
    reaction('e', Action::Emphasis),
];

/// What a key press asks the surface to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show an action, or go back to idle if it is already showing
    Trigger(Action),
    /// Back to idle
    Reset,
    /// Leave the app
    Quit,
    /// Grow the character
    ScaleUp,
    /// Shrink the character
    ScaleDown,
    /// Next color preset
    CycleColor,
    /// Toggle audio reactivity
    ToggleAudio,
}

/// Map a key press to a command
pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Esc => Some(Command::Reset),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Char('+' | '=') => Some(Command::ScaleUp),
        KeyCode::Char('-') => Some(Command::ScaleDown),
        KeyCode::Char('c') => Some(Command::CycleColor),
        KeyCode::Char('a') => Some(Command::ToggleAudio),
        KeyCode::Char(ch) => FEELINGS
            .iter()
            .chain(&ACTIONS)
            .find(|r| r.key == ch)
            .map(|r| Command::Trigger(r.action)),
        _ => None,
    }
}

/// Action after pressing `requested` while `current` is showing
pub fn toggle(current: Action, requested: Action) -> Action {
    if current == requested {
        Action::Idle
    } else {
        requested
    }
}

/// Appearance after a scale step, kept within the supported range
pub fn step_scale(appearance: AppearanceConfig, delta: f32) -> AppearanceConfig {
    let scaled = ((appearance.effective_scale() + delta) * 10.0).round() / 10.0;
    appearance.with_scale(scaled.clamp(MIN_SCALE, MAX_SCALE))
}

/// Appearance with the next color preset
///
/// A custom color starts the cycle from the first preset.
pub fn cycle_color(appearance: AppearanceConfig) -> AppearanceConfig {
    let next = ColorPreset::from_color(appearance.color)
        .map_or(ColorPreset::ALL[0], ColorPreset::next);
    appearance.with_color(next.color())
}

/// Two-line legend: one line per group, the showing action highlighted
pub struct ReactionBar {
    current: Action,
    appearance: AppearanceConfig,
}

impl ReactionBar {
    /// Legend for the current state
    pub fn new(current: Action, appearance: AppearanceConfig) -> Self {
        Self {
            current,
            appearance,
        }
    }

    fn group_line(&self, title: &'static str, reactions: &[Reaction]) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!("{title:<9}"),
            Style::default().fg(theme::GROUP_TITLE),
        )];
        for r in reactions {
            let label_style = if r.action == self.current {
                Style::default()
                    .fg(theme::ACTIVE)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(theme::DIM_GRAY)
            };
            spans.push(Span::styled(
                format!(" {}", r.key),
                Style::default().fg(theme::KEY_HINT),
            ));
            spans.push(Span::styled(format!(" {} ", r.action.label()), label_style));
        }
        Line::from(spans)
    }

    fn settings_line(&self) -> Line<'static> {
        let color = ColorPreset::from_color(self.appearance.color)
            .map_or_else(|| self.appearance.color.to_hex(), |p| p.name().to_string());
        let audio = if self.appearance.audio_reactive {
            "on"
        } else {
            "off"
        };
        Line::from(vec![
            Span::styled("Settings ", Style::default().fg(theme::GROUP_TITLE)),
            Span::styled(
                format!(
                    " +/- size {:.1}  c color {color}  a audio {audio}  esc idle  q quit",
                    self.appearance.effective_scale()
                ),
                Style::default().fg(theme::DIM_GRAY),
            ),
        ])
    }
}

impl Widget for ReactionBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = [
            self.group_line("Feelings", &FEELINGS),
            self.group_line("Actions", &ACTIONS),
            self.settings_line(),
        ];
        for (i, line) in lines.iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.bottom() {
                break;
            }
            buf.set_line(area.x, y, line, area.width);
        }
    }
}
