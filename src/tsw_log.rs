// Logging setup
// The terminal is owned by the UI, so events go to a plain-text file instead

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

/// Install the global subscriber writing to `path`
/// Returns false (logging disabled) when the file cannot be opened
pub fn init(path: &Path, level: &str) -> bool {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(parse_level(level))
        .try_init()
        .is_ok()
}

/// Level from config text, case-insensitive; anything unknown means info
pub fn parse_level(s: &str) -> Level {
    s.trim().parse().unwrap_or(Level::INFO)
}
