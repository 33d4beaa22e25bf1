// Entry point for the tileswpr terminal Minesweeper
// Loads configuration, starts file logging, and hands control to the UI loop

use std::error::Error;

// Module declarations
mod tsw_board; // Board generation, flood-fill reveal, win check
mod tsw_color; // Terminal colour depth matching
mod tsw_config; // User configuration and file locations
mod tsw_game; // Game session and screen state machine
mod tsw_lang; // Multi-language string resources
mod tsw_log; // File logging setup
mod tsw_score; // Append-only highscore log
mod tsw_tiles; // Tile glyph registry
mod tsw_ui; // Terminal UI rendering and event handling

use tsw_config::{data_path, load_or_create_config};
use tsw_lang::Lang;
use tsw_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    // Load or create user configuration (last difficulty, preferences, file locations)
    let mut cfg = load_or_create_config();

    if let Some(path) = data_path("tileswpr.log") {
        tsw_log::init(&path, &cfg.log_level);
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    // Initialize language resources based on saved or system language
    let lang = Lang::new(&cfg.language);
    tracing::debug!(lang = %lang.current_lang, "language selected");

    // Launch the main UI loop
    run_ui(&mut cfg, &lang)
}
