// User configuration and file locations
// Config is TOML in the per-project config directory; the score log and the log file live in the data directory

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::tsw_board::Difficulty;

const SCORE_FILE: &str = "score.csv";
const MIN_FRAME_MS: u64 = 10;

/// User configuration
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // Last difficulty played, shown on the start screen
    pub difficulty: Difficulty,

    // Display preferences
    pub ascii_icons: bool, // Use ASCII fallback tiles
    pub language: String,  // Language code ("en" or "zh")

    // Number of recent results listed on the start screen
    pub highscore_rows: usize,
    // Highscore file override; defaults to score.csv in the data directory
    pub score_file: Option<PathBuf>,

    // Frame cadence of the event loop
    pub frame_ms: u64,
    // Max level written to the log file (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            difficulty: Difficulty::Easy,
            ascii_icons: false,
            language: lang,
            highscore_rows: 9,
            score_file: None,
            frame_ms: 33,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(MIN_FRAME_MS))
    }

    /// Resolved highscore file location
    pub fn score_path(&self) -> PathBuf {
        self.score_file
            .clone()
            .or_else(|| data_path(SCORE_FILE))
            .unwrap_or_else(|| PathBuf::from(SCORE_FILE))
    }
}

fn exe_name() -> Option<String> {
    let exe = env::current_exe().ok()?;
    exe.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

fn project_dirs(name: &str) -> Option<ProjectDirs> {
    ProjectDirs::from("com", "xhbl", name)
}

/// Get the configuration file path
/// Uses platform-specific config directory (e.g., ~/.config/tileswpr/tileswpr.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    let name = exe_name()?;
    let file = format!("{}.toml", name);
    match project_dirs(&name) {
        Some(proj) => Some(proj.config_dir().join(file)),
        None => env::current_dir().ok().map(|dir| dir.join(file)),
    }
}

/// Path of a file in the per-project data directory, falling back to the current directory
pub fn data_path(file: &str) -> Option<PathBuf> {
    let name = exe_name()?;
    match project_dirs(&name) {
        Some(proj) => Some(proj.data_dir().join(file)),
        None => env::current_dir().ok().map(|dir| dir.join(file)),
    }
}

/// Parse a config file body; unknown or missing keys fall back to defaults
pub fn parse_config(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load configuration from disk, or create default if not found or unreadable
pub fn load_or_create_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if path.exists() {
        match fs::read_to_string(&path).map(|s| parse_config(&s)) {
            Ok(Ok(cfg)) => return cfg,
            Ok(Err(e)) => warn!(path = %path.display(), error = %e, "config unreadable, using defaults"),
            Err(e) => warn!(path = %path.display(), error = %e, "config unreadable, using defaults"),
        }
    }
    let cfg = Config::default();
    save_config(&cfg);
    cfg
}

/// Save configuration to disk as TOML (best effort)
pub fn save_config(cfg: &Config) {
    if let Some(path) = config_path() {
        if let Ok(s) = toml::to_string(cfg) {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(e) = fs::write(&path, s) {
                warn!(path = %path.display(), error = %e, "could not save config");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.difficulty = Difficulty::Hard;
        cfg.score_file = Some(PathBuf::from("/tmp/scores.csv"));
        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains("difficulty = \"hard\""));
        assert_eq!(parse_config(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let cfg = parse_config("ascii_icons = true\nhighscore_rows = 4\n").unwrap();
        assert!(cfg.ascii_icons);
        assert_eq!(cfg.highscore_rows, 4);
        assert_eq!(cfg.difficulty, Difficulty::Easy);
        assert_eq!(cfg.frame_ms, 33);
        assert_eq!(cfg.score_file, None);
    }

    #[test]
    fn unknown_difficulty_is_an_error() {
        assert!(parse_config("difficulty = \"Custom\"\n").is_err());
    }

    #[test]
    fn frame_has_a_floor_and_score_file_override_wins() {
        let mut cfg = Config::default();
        cfg.frame_ms = 0;
        assert_eq!(cfg.frame(), Duration::from_millis(MIN_FRAME_MS));
        cfg.score_file = Some(PathBuf::from("elsewhere.csv"));
        assert_eq!(cfg.score_path(), PathBuf::from("elsewhere.csv"));
    }
}
