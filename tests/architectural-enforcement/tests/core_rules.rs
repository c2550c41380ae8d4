//! Integration Test: Headless Core Rules
//!
//! **Policy**: `sidekick/core` advances on a virtual clock, draws randomness
//! only through its injectable source, and never imports a UI framework.

use architectural_enforcement::{rust_files, scan, Violation};

const CORE_SRC: &str = "sidekick/core/src";

fn report(title: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!("\nFound {} violation(s). Fix these before merging!", violations.len());
}

#[test]
fn test_core_sources_are_found() {
    assert!(rust_files(CORE_SRC).len() > 5);
}

/// Timers run on the caller's deltas; nothing in the core may block
#[test]
fn test_no_sleep_in_core() {
    let violations = scan(CORE_SRC, |_, code| {
        code.contains("::sleep(") || code.contains(".sleep(")
    });
    report("Sleep calls found in the core", &violations);
}

/// Wall-clock reads would make timers untestable
#[test]
fn test_no_wall_clock_in_core() {
    let violations = scan(CORE_SRC, |_, code| {
        code.contains("Instant::now") || code.contains("SystemTime::now")
    });
    report("Wall-clock reads found in the core", &violations);
}

/// Only the randomness module touches `rand`
#[test]
fn test_randomness_goes_through_random_source() {
    let violations = scan(CORE_SRC, |path, code| {
        !path.ends_with("random.rs")
            && (code.contains("rand::") || code.contains("thread_rng"))
    });
    report("Direct randomness found outside random.rs", &violations);
}

/// The core stays headless
#[test]
fn test_no_ui_framework_in_core() {
    let violations = scan(CORE_SRC, |_, code| {
        code.contains("ratatui") || code.contains("crossterm")
    });
    report("UI framework imports found in the core", &violations);
}

/// The surface rate-limits frames, but only in the app loop
#[test]
fn test_tui_sleeps_only_for_frame_pacing() {
    let violations = scan("tui/src", |path, code| {
        (code.contains("::sleep(") || code.contains(".sleep("))
            && !(path.ends_with("app.rs") && code.contains("frame_duration"))
    });
    report("Sleep outside frame pacing in the TUI", &violations);
}
