// Game session and screen flow
// A Game owns one board being played; Session moves between Start, Playing and End

use std::fmt;
use std::mem;
use tracing::{debug, info};

use crate::tsw_board::{Board, Difficulty, Grid, Reveal, check_win, reveal};

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    /// Text used in the highscore file
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
        }
    }

    pub fn from_label(s: &str) -> Option<Outcome> {
        match s {
            "win" => Some(Outcome::Win),
            "loss" => Some(Outcome::Loss),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State of one board in play
#[derive(Debug, Clone)]
pub struct Game {
    pub difficulty: Difficulty,
    pub board: Board,
    pub visited: Grid<bool>, // revealed cells, grows during the game
    pub flagged: Grid<bool>, // cosmetic markers, never block a reveal
    pub clicks: u32,         // reveal clicks on the board, reported as the score
}

impl Game {
    /// Start a game on a freshly generated board
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_board(difficulty, Board::generate(difficulty))
    }

    pub fn with_board(difficulty: Difficulty, board: Board) -> Self {
        let visited = board.empty_visited();
        let flagged = board.empty_visited();
        Game {
            difficulty,
            board,
            visited,
            flagged,
            clicks: 0,
        }
    }

    /// Reveal a cell; returns the outcome once the game is decided
    /// Clicks off the board are ignored and not counted
    pub fn reveal(&mut self, x: usize, y: usize) -> Option<Outcome> {
        match reveal(&self.board, &mut self.visited, x, y) {
            Reveal::Outside => None,
            Reveal::Mine => {
                self.clicks += 1;
                debug!(x, y, "mine revealed");
                Some(Outcome::Loss)
            }
            Reveal::Opened(n) => {
                self.clicks += 1;
                debug!(x, y, opened = n, "cells revealed");
                check_win(&self.visited, self.board.mines()).then_some(Outcome::Win)
            }
        }
    }

    /// Toggle the flag marker on a covered cell
    pub fn toggle_flag(&mut self, x: usize, y: usize) {
        if !self.flagged.contains(x, y) || self.visited.is_set(x, y) {
            return;
        }
        let flag = !self.flagged.is_set(x, y);
        self.flagged.set(x, y, flag);
        debug!(x, y, flag, "flag toggled");
    }

    /// Mine counter for the status line (total mines - flags); negative with too many flags
    pub fn remaining_mines(&self) -> isize {
        self.board.mines() as isize - self.flagged.count_set() as isize
    }
}

/// Current screen and the data it shows
#[derive(Debug)]
pub enum Screen {
    Start,
    Playing(Game),
    End { game: Game, outcome: Outcome },
}

/// Player input, already mapped to board coordinates by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Select(Difficulty),
    Reveal(usize, usize),
    Flag(usize, usize),
    Confirm,
    Quit,
}

/// Screen changes reported back to the front end for its side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started(Difficulty),
    Finished {
        difficulty: Difficulty,
        outcome: Outcome,
        score: u32,
    },
    Restarted,
    Quit,
}

#[derive(Debug)]
pub struct Session {
    screen: Screen,
    quit: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            screen: Screen::Start,
            quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// Enter the play screen with a prepared game
    pub fn start_with(&mut self, game: Game) -> Transition {
        let difficulty = game.difficulty;
        info!(difficulty = difficulty.label(), "game started");
        self.screen = Screen::Playing(game);
        Transition::Started(difficulty)
    }

    /// Apply one input; inputs that mean nothing on the current screen are ignored
    pub fn handle(&mut self, input: Input) -> Option<Transition> {
        if input == Input::Quit {
            self.quit = true;
            return Some(Transition::Quit);
        }
        match &mut self.screen {
            Screen::Start => match input {
                Input::Select(d) => Some(self.start_with(Game::new(d))),
                _ => None,
            },
            Screen::Playing(game) => match input {
                Input::Reveal(x, y) => {
                    let outcome = game.reveal(x, y)?;
                    let finished = Transition::Finished {
                        difficulty: game.difficulty,
                        outcome,
                        score: game.clicks,
                    };
                    info!(
                        difficulty = game.difficulty.label(),
                        %outcome,
                        score = game.clicks,
                        "game finished"
                    );
                    self.finish(outcome);
                    Some(finished)
                }
                Input::Flag(x, y) => {
                    game.toggle_flag(x, y);
                    None
                }
                _ => None,
            },
            Screen::End { .. } => match input {
                Input::Confirm => {
                    self.screen = Screen::Start;
                    Some(Transition::Restarted)
                }
                _ => None,
            },
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        if let Screen::Playing(game) = mem::replace(&mut self.screen, Screen::Start) {
            self.screen = Screen::End { game, outcome };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x3 with a single mine at the top-left corner
    fn corner_game() -> Game {
        Game::with_board(Difficulty::Easy, Board::from_mines(3, 3, &[(0, 0)]))
    }

    fn playing(game: Game) -> Session {
        let mut s = Session::new();
        s.start_with(game);
        s
    }

    #[test]
    fn select_starts_a_fresh_game() {
        let mut s = Session::new();
        assert_eq!(
            s.handle(Input::Select(Difficulty::Medium)),
            Some(Transition::Started(Difficulty::Medium))
        );
        match s.screen() {
            Screen::Playing(game) => {
                assert_eq!(game.board.width(), 16);
                assert_eq!(game.board.mines(), 40);
                assert_eq!(game.visited.count_set(), 0);
                assert_eq!(game.clicks, 0);
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn mine_click_ends_in_loss() {
        let mut s = playing(corner_game());
        assert_eq!(
            s.handle(Input::Reveal(0, 0)),
            Some(Transition::Finished {
                difficulty: Difficulty::Easy,
                outcome: Outcome::Loss,
                score: 1,
            })
        );
        assert!(matches!(
            s.screen(),
            Screen::End {
                outcome: Outcome::Loss,
                ..
            }
        ));
    }

    #[test]
    fn revealing_all_safe_cells_wins_with_click_score() {
        let mut s = playing(corner_game());
        assert_eq!(s.handle(Input::Reveal(1, 0)), None);
        assert_eq!(s.handle(Input::Reveal(1, 0)), None);
        // (2, 2) is empty and opens the rest of the board
        assert_eq!(
            s.handle(Input::Reveal(2, 2)),
            Some(Transition::Finished {
                difficulty: Difficulty::Easy,
                outcome: Outcome::Win,
                score: 3,
            })
        );
    }

    #[test]
    fn clicks_off_the_board_are_not_counted() {
        let mut s = playing(corner_game());
        assert_eq!(s.handle(Input::Reveal(7, 7)), None);
        match s.screen() {
            Screen::Playing(game) => assert_eq!(game.clicks, 0),
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn flags_are_cosmetic() {
        let mut game = corner_game();
        game.toggle_flag(0, 0);
        assert!(game.flagged.is_set(0, 0));
        assert_eq!(game.remaining_mines(), 0);
        assert_eq!(game.reveal(0, 0), Some(Outcome::Loss));

        let mut game = corner_game();
        game.reveal(1, 1);
        game.toggle_flag(1, 1);
        assert!(!game.flagged.is_set(1, 1));
        game.toggle_flag(2, 2);
        game.toggle_flag(2, 2);
        assert!(!game.flagged.is_set(2, 2));
    }

    #[test]
    fn confirm_returns_to_start_only_from_end() {
        let mut s = Session::new();
        assert_eq!(s.handle(Input::Confirm), None);
        assert_eq!(s.handle(Input::Reveal(0, 0)), None);
        assert!(matches!(s.screen(), Screen::Start));

        let mut s = playing(corner_game());
        assert_eq!(s.handle(Input::Confirm), None);
        assert_eq!(s.handle(Input::Select(Difficulty::Hard)), None);
        assert!(matches!(s.screen(), Screen::Playing(_)));

        s.handle(Input::Reveal(0, 0));
        assert_eq!(s.handle(Input::Reveal(2, 2)), None);
        assert_eq!(s.handle(Input::Confirm), Some(Transition::Restarted));
        assert!(matches!(s.screen(), Screen::Start));
    }

    #[test]
    fn quit_works_from_every_screen() {
        let mut s = Session::new();
        assert_eq!(s.handle(Input::Quit), Some(Transition::Quit));
        assert!(s.is_quit());

        let mut s = playing(corner_game());
        s.handle(Input::Quit);
        assert!(s.is_quit());

        let mut s = playing(corner_game());
        s.handle(Input::Reveal(0, 0));
        s.handle(Input::Quit);
        assert!(s.is_quit());
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(Outcome::Win.to_string(), "win");
        assert_eq!(Outcome::from_label("loss"), Some(Outcome::Loss));
        assert_eq!(Outcome::from_label("draw"), None);
    }
}
