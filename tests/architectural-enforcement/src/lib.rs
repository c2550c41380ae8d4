//! Architectural Enforcement Integration Tests
//!
//! This package contains source-scanning tests that enforce the core crate's
//! rules:
//! - No sleep() calls: time is virtual and advanced by the caller
//! - No global randomness outside the randomness module
//! - No UI framework imports in the headless core
//!
//! The helpers here walk a source tree and report offending lines, skipping
//! comments and `#[cfg(test)]` modules.

use std::fs;
use std::path::{Path, PathBuf};

/// One offending line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the line
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Trimmed source text
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Every `.rs` file under `dir`, relative to the workspace root
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Production lines of a source file: comments stripped, test modules skipped
///
/// Returns `(line_number, code)` pairs.
pub fn production_lines(source: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut in_test_module = false;
    let mut pending_cfg_test = false;
    let mut depth: i32 = 0;
    let mut test_depth: i32 = 0;

    for (idx, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") {
            pending_cfg_test = true;
            continue;
        }
        if pending_cfg_test && trimmed.starts_with("mod ") {
            in_test_module = true;
            test_depth = depth;
        }
        pending_cfg_test = false;

        let code = line.split("//").next().unwrap_or(line);
        depth += code.matches('{').count() as i32 - code.matches('}').count() as i32;

        if in_test_module {
            if depth <= test_depth {
                in_test_module = false;
            }
            continue;
        }
        if !code.trim().is_empty() {
            out.push((idx + 1, code.to_string()));
        }
    }
    out
}

/// Scan production lines of every file under `dir` with `is_violation`
pub fn scan(dir: &str, is_violation: impl Fn(&Path, &str) -> bool) -> Vec<Violation> {
    let mut violations = Vec::new();
    for path in rust_files(dir) {
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, code) in production_lines(&source) {
            if is_violation(&path, &code) {
                violations.push(Violation {
                    path: path.clone(),
                    line,
                    text: code.trim().to_string(),
                });
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_comments_and_tests() {
        let source = "\
fn real() {
    work(); // sleep(1)
}

#[cfg(test)]
mod tests {
    fn helper() {
        std::thread::sleep(d);
    }
}

fn after() {}
";
        let lines = production_lines(source);
        assert!(lines.iter().all(|(_, code)| !code.contains("sleep")));
        assert!(lines.iter().any(|(_, code)| code.contains("fn after")));
    }

    #[test]
    fn test_workspace_root_has_core() {
        assert!(workspace_root().join("sidekick/core/src/lib.rs").exists());
    }
}
