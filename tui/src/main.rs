//! Sidekick TUI Entry Point
//!
//! Usage:
//!   sidekick [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>    Config file (default: ~/.config/sidekick/sidekick.toml)
//!   --color <COLOR>        Body color: hex or preset name
//!   --scale <SCALE>        Body scale
//!   --audio-reactive       Pulse with (synthetic) audio volume
//!   --seed <SEED>          Fix the randomness source
//!   --fps <FPS>            Display refresh rate
//!   --action <ACTION>      Action to show at startup

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sidekick_core::{load_config_from_path, Action, ConfigOverrides, SidekickConfig};
use sidekick_tui::app::start_action;
use sidekick_tui::App;

/// Animated sidekick for the terminal
#[derive(Parser, Debug)]
#[command(name = "sidekick")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short = 'c', long, env = "SIDEKICK_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Body color, hex (#BAE6FD) or preset (sky, mint, pink, violet, gold, cloud)
    #[arg(long, value_name = "COLOR")]
    color: Option<String>,

    /// Body scale
    #[arg(long, value_name = "SCALE")]
    scale: Option<f32>,

    /// Pulse with audio volume
    #[arg(long)]
    audio_reactive: bool,

    /// Seed for reproducible particles and fidgets
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Display refresh rate
    #[arg(long, value_name = "FPS")]
    fps: Option<u32>,

    /// Action to show at startup (unknown names show IDLE)
    #[arg(long, value_name = "ACTION")]
    action: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(color) = &self.color {
            overrides = overrides.with_color(color.clone());
        }
        if let Some(scale) = self.scale {
            overrides = overrides.with_scale(scale);
        }
        if self.audio_reactive {
            overrides = overrides.with_audio_reactive(true);
        }
        if let Some(seed) = self.seed {
            overrides = overrides.with_seed(seed);
        }
        if let Some(fps) = self.fps {
            overrides = overrides.with_fps(fps);
        }
        overrides
    }
}

/// Log file under the user's cache directory, when one exists
fn log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("sidekick");
    fs::create_dir_all(&dir).ok()?;
    File::create(dir.join("sidekick.log")).ok()
}

/// Route tracing to a file; the terminal belongs to the UI
fn init_logging() {
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false);
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    match log_file() {
        Some(file) => registry.with(layer.with_writer(Mutex::new(file))).init(),
        None => registry.with(layer.with_writer(io::sink)).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let mut config = load_config_from_path(args.config.clone()).context("loading config")?;
    args.overrides()
        .apply(&mut config)
        .context("applying command-line options")?;
    tracing::info!(source = %config.source(), fps = config.fps, "config loaded");

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: sidekick requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin/stdout are piped or there is no -t on ssh.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let initial = start_action(args.action.as_deref());
    let result = run_app(&mut terminal, &config, initial).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &SidekickConfig,
    initial: Action,
) -> anyhow::Result<()> {
    let mut app = App::new(config).starting_with(initial);
    app.run(terminal).await
}
