use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Colour depth of the attached terminal, probed once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed,
    Basic,
}

impl Depth {
    pub fn detect() -> Depth {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed
        } else {
            Depth::Basic
        }
    }

    /// Map a named ANSI colour to the Campbell palette at this depth so tiles
    /// look the same across terminals. Rgb/Indexed colours pass through.
    pub fn resolve(self, color: Color) -> Color {
        match (self, campbell(color)) {
            (Depth::TrueColor, Some(((r, g, b), _))) => Color::Rgb(r, g, b),
            (Depth::Indexed, Some((_, index))) => Color::Indexed(index),
            _ => color,
        }
    }
}

// (RGB, nearest stable 256-colour index)
fn campbell(color: Color) -> Option<((u8, u8, u8), u8)> {
    Some(match color {
        Color::Black => ((12, 12, 12), 232),
        Color::Red => ((197, 15, 31), 160),
        Color::Green => ((19, 161, 14), 28),
        Color::Yellow => ((193, 156, 0), 178),
        Color::Blue => ((0, 55, 218), 20),
        Color::Magenta => ((136, 23, 152), 90),
        Color::Cyan => ((58, 150, 221), 38),
        Color::Gray => ((204, 204, 204), 250),
        Color::DarkGray => ((118, 118, 118), 243),
        Color::LightRed => ((231, 72, 86), 203),
        Color::LightGreen => ((22, 198, 12), 46),
        Color::LightYellow => ((249, 241, 165), 229),
        Color::LightBlue => ((59, 120, 255), 63),
        Color::LightMagenta => ((180, 0, 158), 163),
        Color::LightCyan => ((97, 214, 214), 116),
        Color::White => ((242, 242, 242), 255),
        _ => return None,
    })
}
