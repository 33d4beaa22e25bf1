use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io::{self, Stdout};
use std::time::Instant;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use crate::tsw_board::Difficulty;
use crate::tsw_color::Depth;
use crate::tsw_config::{Config, save_config};
use crate::tsw_game::{Game, Input, Outcome, Screen, Session, Transition};
use crate::tsw_lang::{Lang, fill};
use crate::tsw_score::{HighscoreRecord, ScoreStore};
use crate::tsw_tiles::{Tile, TileSet};

// Fixed frame for the start screen
const MENU_W: u16 = 64;
const MENU_H: u16 = 22;
// Status row under the board is never narrower than this
const STATUS_W: u16 = 40;

type Term = Terminal<CrosstermBackend<Stdout>>;

// Raw mode, alternate screen and mouse capture for the lifetime of the UI
struct TuiGuard {
    terminal: Term,
}

impl TuiGuard {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        Ok(TuiGuard { terminal })
    }
}

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

// Per-frame view data that is not part of the game itself
#[derive(Debug, Default)]
struct View {
    scores: Vec<HighscoreRecord>,
    board_rect: Option<Rect>, // where the board was last drawn, for mouse hit tests
}

pub fn run(cfg: &mut Config, lang: &Lang) -> Result<(), Box<dyn Error>> {
    let tiles = TileSet::load(cfg.ascii_icons, Depth::detect());
    let store = ScoreStore::new(cfg.score_path());
    info!(scores = %store.path().display(), "ui starting");

    let mut view = View {
        scores: load_scores(&store, cfg.highscore_rows),
        board_rect: None,
    };
    let mut session = Session::new();
    let mut tui = TuiGuard::new()?;

    let frame = cfg.frame();
    let mut last_tick = Instant::now();

    while !session.is_quit() {
        tui.terminal.draw(|f| draw(f, &session, &mut view, &tiles, lang, cfg))?;

        let timeout = frame.checked_sub(last_tick.elapsed()).unwrap_or_default();
        if event::poll(timeout)? {
            let ev = event::read()?;
            if let Some(input) = map_event(&ev, session.screen(), view.board_rect) {
                match session.handle(input) {
                    Some(Transition::Started(d)) => cfg.difficulty = d,
                    Some(Transition::Finished {
                        difficulty,
                        outcome,
                        score,
                    }) => {
                        let record = HighscoreRecord::today(outcome, difficulty, score);
                        if let Err(e) = store.append(&record) {
                            warn!(error = %e, "could not save highscore");
                        }
                    }
                    Some(Transition::Restarted) => {
                        view.scores = load_scores(&store, cfg.highscore_rows);
                    }
                    Some(Transition::Quit) | None => {}
                }
            }
        }

        if last_tick.elapsed() >= frame {
            last_tick = Instant::now();
        }
    }

    // Remember the last difficulty played
    save_config(cfg);
    info!("ui stopped");
    Ok(())
}

fn load_scores(store: &ScoreStore, rows: usize) -> Vec<HighscoreRecord> {
    store.recent(rows).unwrap_or_else(|e| {
        warn!(error = %e, "could not read highscores");
        Vec::new()
    })
}

/// Translate a terminal event into game input
/// Mouse clicks only count when they land on a board cell
fn map_event(ev: &Event, screen: &Screen, board_rect: Option<Rect>) -> Option<Input> {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
            KeyCode::Char(' ') => Some(Input::Confirm),
            KeyCode::Char(c) => Difficulty::from_key(*c).map(Input::Select),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            ..
        }) => {
            let Screen::Playing(game) = screen else {
                return None;
            };
            let (x, y) = cell_at(board_rect?, game.board.width(), game.board.height(), *column, *row)?;
            match button {
                MouseButton::Left => Some(Input::Reveal(x, y)),
                MouseButton::Right => Some(Input::Flag(x, y)),
                MouseButton::Middle => None,
            }
        }
        _ => None,
    }
}

/// Board cell under a terminal position; cells are two columns wide inside the border
fn cell_at(area: Rect, w: usize, h: usize, column: u16, row: u16) -> Option<(usize, usize)> {
    let col = column.checked_sub(area.x + 1)? as usize;
    let y = row.checked_sub(area.y + 1)? as usize;
    let x = col / 2;
    (x < w && y < h).then_some((x, y))
}

// Bordered board block: two columns per cell plus one padding column
fn board_size(game: &Game) -> (u16, u16) {
    ((game.board.width() * 2) as u16 + 3, game.board.height() as u16 + 2)
}

/// Smallest terminal that fits the current screen
fn required_size(screen: &Screen) -> (u16, u16) {
    match screen {
        Screen::Start => (MENU_W, MENU_H),
        Screen::Playing(game) | Screen::End { game, .. } => {
            let (w, h) = board_size(game);
            (w.max(STATUS_W), h + 1)
        }
    }
}

fn draw<B: Backend>(f: &mut Frame<B>, session: &Session, view: &mut View, tiles: &TileSet, lang: &Lang, cfg: &Config) {
    let size = f.size();
    let (min_w, min_h) = required_size(session.screen());
    // If terminal too small, render a centered warning and skip normal UI
    if size.width < min_w || size.height < min_h {
        view.board_rect = None;
        let a = &lang.assets;
        let warn_lines = vec![
            Spans::from(Span::raw(a.tsmsg_line1)),
            Spans::from(Span::raw(fill(a.tsmsg_line2_fmt, &[&min_w, &min_h]))),
        ];
        let warn = Paragraph::new(Text::from(warn_lines))
            .block(Block::default().borders(Borders::ALL).title(a.tsmsg_title))
            .alignment(Alignment::Center);
        f.render_widget(Clear, size);
        let w = 40u16.min(size.width);
        let h = 4u16.min(size.height);
        f.render_widget(warn, center_rect(w, h, size));
        return;
    }

    match session.screen() {
        Screen::Start => {
            view.board_rect = None;
            draw_start(f, size, &view.scores, tiles, lang, cfg.difficulty);
        }
        Screen::Playing(game) => {
            view.board_rect = Some(draw_board(f, size, game, false, tiles, lang));
        }
        Screen::End { game, outcome } => {
            let board = draw_board(f, size, game, true, tiles, lang);
            view.board_rect = Some(board);
            draw_banner(f, size, board, *outcome, game.clicks, tiles, lang);
        }
    }
}

fn draw_start<B: Backend>(
    f: &mut Frame<B>,
    size: Rect,
    scores: &[HighscoreRecord],
    tiles: &TileSet,
    lang: &Lang,
    last: Difficulty,
) {
    let a = &lang.assets;
    let area = center_rect(MENU_W, MENU_H, size);
    let inner_w = area.width.saturating_sub(2) as usize;
    let inner_h = area.height.saturating_sub(2) as usize;
    let rule = Spans::from(Span::styled("─".repeat(inner_w), Style::default().fg(tiles.color(Color::DarkGray))));
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Spans::from(Span::styled(format!(" {}", a.start_title), bold)),
        Spans::from(Span::raw(format!(" {}", a.start_header))),
        rule.clone(),
    ];
    let bottom = vec![
        rule,
        Spans::from(Span::styled(format!(" {}", a.start_choose), bold)),
        Spans::from(Span::styled(
            format!(" {}", a.start_keys),
            Style::default().fg(tiles.color(Color::Yellow)),
        )),
        Spans::from(Span::raw(format!(" {}", fill(a.start_last_fmt, &[&last.label()])))),
        Spans::from(Span::styled(
            format!(" {}", a.hint_quit),
            Style::default().fg(tiles.color(Color::DarkGray)),
        )),
    ];

    let room = inner_h.saturating_sub(lines.len() + bottom.len());
    if scores.is_empty() {
        lines.push(Spans::from(Span::styled(
            format!(" {}", a.start_empty),
            Style::default().fg(tiles.color(Color::DarkGray)),
        )));
    }
    // newest rows are at the end, so keep the tail when space runs out
    for r in &scores[scores.len().saturating_sub(room)..] {
        let color = match r.outcome {
            Outcome::Win => Color::Green,
            Outcome::Loss => Color::Red,
        };
        lines.push(Spans::from(vec![
            Span::raw(format!(" {}, ", r.date)),
            Span::styled(r.outcome.label(), Style::default().fg(tiles.color(color))),
            Span::raw(format!(", {}, {}", r.difficulty.label(), r.score)),
        ]));
    }
    while lines.len() + bottom.len() < inner_h {
        lines.push(Spans::from(Span::raw("")));
    }
    lines.extend(bottom);

    f.render_widget(Clear, area);
    let menu = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(menu, area);
}

/// Draw the board centered in `size` and return the bordered board rect
/// With `reveal_all` every cell is shown uncovered, mines included
fn draw_board<B: Backend>(
    f: &mut Frame<B>,
    size: Rect,
    game: &Game,
    reveal_all: bool,
    tiles: &TileSet,
    lang: &Lang,
) -> Rect {
    let a = &lang.assets;
    let (bw, bh) = board_size(game);
    let outer = center_rect(bw, bh + 1, size);
    let board_area = Rect::new(outer.x, outer.y, bw, bh);
    let status_area = center_rect(bw.max(STATUS_W), 1, Rect::new(size.x, outer.y + bh, size.width, 1));
    let board_bg = tiles.board_bg();

    let mut lines = Vec::with_capacity(game.board.height());
    for y in 0..game.board.height() {
        let mut spans = Vec::with_capacity(game.board.width() + 1);
        for x in 0..game.board.width() {
            let tile = match game.board.cell(x, y) {
                Some(cell) if reveal_all || game.visited.is_set(x, y) => Tile::open(cell),
                _ => Tile::covered(game.flagged.is_set(x, y)),
            };
            spans.push(tiles.span(tile));
        }
        // one padding column on the right, in the board background
        spans.push(Span::styled(" ", Style::default().bg(board_bg)));
        lines.push(Spans::from(spans));
    }
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(game.difficulty.label())
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Left);
    f.render_widget(paragraph, board_area);

    // status row: mine counter and clicks (or the restart prompt) on the left, quit hint on the right
    let left = if reveal_all {
        format!(" {} ", a.again)
    } else {
        fill(a.status_fmt, &[&game.remaining_mines(), &game.clicks])
    };
    let gap = (status_area.width as usize).saturating_sub(left.width() + a.hint_quit.width() + 1).max(1);
    let status = Paragraph::new(Spans::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(gap)),
        Span::styled(a.hint_quit, Style::default().fg(tiles.color(Color::DarkGray))),
    ]));
    f.render_widget(status, status_area);

    board_area
}

// Result line across the middle of the board, allowed to overhang a narrow board
fn draw_banner<B: Backend>(
    f: &mut Frame<B>,
    size: Rect,
    board: Rect,
    outcome: Outcome,
    score: u32,
    tiles: &TileSet,
    lang: &Lang,
) {
    let a = &lang.assets;
    let text = match outcome {
        Outcome::Win => fill(a.win_fmt, &[&score]),
        Outcome::Loss => fill(a.loss_fmt, &[&score]),
    };
    let w = text.width() as u16 + 2;
    let area = center_rect(w, 1, Rect::new(size.x, board.y, size.width, board.height));
    let style = Style::default()
        .fg(tiles.color(Color::White))
        .bg(tiles.color(Color::Black))
        .add_modifier(Modifier::BOLD);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Span::styled(text, style))
            .style(style)
            .alignment(Alignment::Center),
        area,
    );
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
