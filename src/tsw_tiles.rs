// Tile asset registry: the glyph and colours drawn for each board state
// Loaded once when the UI starts and lent to every draw call; dropped when the UI exits

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use tracing::debug;

use crate::tsw_board::Cell;
use crate::tsw_color::Depth;

/// Visual state of one board position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Number(u8),
    Empty,
    Flag,
    Back, // covered
    Mine,
}

impl Tile {
    /// Tile for an uncovered cell
    pub fn open(cell: Cell) -> Tile {
        match cell {
            Cell::Mine => Tile::Mine,
            Cell::Empty => Tile::Empty,
            Cell::Number(n) => Tile::Number(n),
        }
    }

    pub fn covered(flagged: bool) -> Tile {
        if flagged { Tile::Flag } else { Tile::Back }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub symbol: &'static str,
    pub style: Style,
}

const NUMBER_SYMBOLS: [&str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];
const NUMBER_COLORS: [Color; 8] = [
    Color::Blue,
    Color::Green,
    Color::Red,
    Color::Magenta,
    Color::LightRed,
    Color::Cyan,
    Color::Black,
    Color::DarkGray,
];

pub struct TileSet {
    numbers: [Glyph; 8],
    empty: Glyph,
    flag: Glyph,
    back: Glyph,
    mine: Glyph,
    depth: Depth,
}

impl TileSet {
    /// Build every tile for the given icon style and colour depth
    pub fn load(ascii: bool, depth: Depth) -> Self {
        let open_bg = depth.resolve(Color::Gray);
        let covered_bg = depth.resolve(Color::DarkGray);
        let glyph = |symbol: &'static str, fg: Color, bg: Color| Glyph {
            symbol,
            style: Style::default().fg(depth.resolve(fg)).bg(bg),
        };

        let numbers = std::array::from_fn(|i| {
            let g = glyph(NUMBER_SYMBOLS[i], NUMBER_COLORS[i], open_bg);
            Glyph {
                style: g.style.add_modifier(Modifier::BOLD),
                ..g
            }
        });
        debug!(ascii, ?depth, "tile set loaded");
        TileSet {
            numbers,
            empty: glyph(" ", Color::Gray, open_bg),
            flag: glyph(if ascii { "F" } else { "⚑" }, Color::Red, covered_bg),
            back: glyph(if ascii { "#" } else { "■" }, Color::Gray, covered_bg),
            mine: glyph(if ascii { "*" } else { "☼" }, Color::Black, open_bg),
            depth,
        }
    }

    pub fn glyph(&self, tile: Tile) -> Glyph {
        match tile {
            Tile::Number(n) => self.numbers[(n.clamp(1, 8) - 1) as usize],
            Tile::Empty => self.empty,
            Tile::Flag => self.flag,
            Tile::Back => self.back,
            Tile::Mine => self.mine,
        }
    }

    /// Two-column span for one board position
    pub fn span(&self, tile: Tile) -> Span<'static> {
        let g = self.glyph(tile);
        Span::styled(format!(" {}", g.symbol), g.style)
    }

    /// Background used between and around tiles
    pub fn board_bg(&self) -> Color {
        self.back.style.bg.unwrap_or(Color::Reset)
    }

    /// Resolve a UI colour at the same depth as the tiles
    pub fn color(&self, color: Color) -> Color {
        self.depth.resolve(color)
    }
}
