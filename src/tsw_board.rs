// Board model: difficulty presets, mine placement, neighbour counts
// Also holds the reveal flood fill and the win check used by the game session

use rand::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,   // 9x9, 10 mines
    Medium, // 16x16, 40 mines
    Hard,   // 30x16, 99 mines
}

/// All presets in selection order (keys 1, 2, 3)
pub const DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

impl Serialize for Difficulty {
    /// Serialize difficulty as its label, the same text the highscore file uses
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Difficulty, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Difficulty::from_label(&s).ok_or_else(|| serde::de::Error::custom("unknown difficulty"))
    }
}

impl Difficulty {
    /// Board dimensions and mine count: (width, height, mines)
    pub fn params(&self) -> (usize, usize, usize) {
        match self {
            Difficulty::Easy => (9, 9, 10),
            Difficulty::Medium => (16, 16, 40),
            Difficulty::Hard => (30, 16, 99),
        }
    }

    /// Stable identifier, written to the highscore file and the config file
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_label(s: &str) -> Option<Difficulty> {
        DIFFICULTIES.into_iter().find(|d| d.label() == s)
    }

    /// Key that selects this preset on the start screen
    pub fn key(&self) -> char {
        match self {
            Difficulty::Easy => '1',
            Difficulty::Medium => '2',
            Difficulty::Hard => '3',
        }
    }

    pub fn from_key(c: char) -> Option<Difficulty> {
        DIFFICULTIES.into_iter().find(|d| d.key() == c)
    }
}

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Row-major 2D storage addressed by (x, y)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    pub w: usize,
    pub h: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(w: usize, h: usize, fill: T) -> Self {
        Grid {
            w,
            h,
            cells: vec![fill; w * h],
        }
    }
}

impl<T> Grid<T> {
    /// Convert (x, y) coordinates to flat array index
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if self.contains(x, y) {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Writes outside the grid are ignored
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if self.contains(x, y) {
            let idx = self.index(x, y);
            self.cells[idx] = value;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// In-bounds cells of the 8-neighbourhood of (x, y)
    /// Offsets that fall off an edge are simply skipped
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.w, self.h);
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (nx < w && ny < h).then_some((nx, ny))
        })
    }
}

impl Grid<bool> {
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.get(x, y).copied().unwrap_or(false)
    }

    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|b| **b).count()
    }
}

/// Content of one board position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Mine,
    Empty,      // no adjacent mines
    Number(u8), // 1..=8 adjacent mines
}

/// Number of mines in the 8-neighbourhood of (x, y)
pub fn count_adjacent_mines(mines: &Grid<bool>, x: usize, y: usize) -> u8 {
    mines
        .neighbors(x, y)
        .filter(|&(nx, ny)| mines.is_set(nx, ny))
        .count() as u8
}

/// A generated minefield; cells never change after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Grid<Cell>,
    mines: usize,
}

impl Board {
    /// Generate a board for a preset using the thread RNG
    pub fn generate(difficulty: Difficulty) -> Self {
        Self::generate_with(difficulty, &mut thread_rng())
    }

    /// Place the preset's mines at distinct random positions, redrawing on collision
    pub fn generate_with<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let (w, h, n) = difficulty.params();
        debug_assert!(n < w * h);
        let mut mines = Grid::new(w, h, false);
        let mut placed = 0;
        while placed < n {
            let x = rng.gen_range(0..w);
            let y = rng.gen_range(0..h);
            if mines.is_set(x, y) {
                continue;
            }
            mines.set(x, y, true);
            placed += 1;
        }
        Self::from_mine_grid(&mines)
    }

    /// Build a board with mines at the given positions; positions off the board are dropped
    #[cfg(test)]
    pub fn from_mines(w: usize, h: usize, positions: &[(usize, usize)]) -> Self {
        let mut mines = Grid::new(w, h, false);
        for &(x, y) in positions {
            mines.set(x, y, true);
        }
        Self::from_mine_grid(&mines)
    }

    fn from_mine_grid(mines: &Grid<bool>) -> Self {
        let mut cells = Grid::new(mines.w, mines.h, Cell::Empty);
        for y in 0..mines.h {
            for x in 0..mines.w {
                let cell = if mines.is_set(x, y) {
                    Cell::Mine
                } else {
                    match count_adjacent_mines(mines, x, y) {
                        0 => Cell::Empty,
                        n => Cell::Number(n),
                    }
                };
                cells.set(x, y, cell);
            }
        }
        Board {
            cells,
            mines: mines.count_set(),
        }
    }

    pub fn width(&self) -> usize {
        self.cells.w
    }

    pub fn height(&self) -> usize {
        self.cells.h
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(x, y).copied()
    }

    pub fn cells(&self) -> &Grid<Cell> {
        &self.cells
    }

    /// A visited set matching this board, nothing revealed
    pub fn empty_visited(&self) -> Grid<bool> {
        Grid::new(self.width(), self.height(), false)
    }
}

/// Result of a single reveal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Outside,       // coordinates not on the board
    Mine,          // a mine was uncovered
    Opened(usize), // cells newly marked visited by this call
}

/// Reveal (x, y) and cascade through connected empty cells
///
/// The walk uses an explicit stack and its own guard grid, so nothing from an
/// earlier call can stop or re-trigger it. Numbered cells are revealed but do
/// not spread; empty cells spread to all in-bounds neighbours.
pub fn reveal(board: &Board, visited: &mut Grid<bool>, x: usize, y: usize) -> Reveal {
    let Some(start) = board.cell(x, y) else {
        return Reveal::Outside;
    };
    if start == Cell::Mine {
        visited.set(x, y, true);
        return Reveal::Mine;
    }

    let mut seen = board.empty_visited();
    let mut stack = vec![(x, y)];
    let mut opened = 0;
    while let Some((cx, cy)) = stack.pop() {
        if seen.is_set(cx, cy) {
            continue;
        }
        seen.set(cx, cy, true);
        if !visited.is_set(cx, cy) {
            visited.set(cx, cy, true);
            opened += 1;
        }
        if board.cell(cx, cy) == Some(Cell::Empty) {
            stack.extend(
                board
                    .cells()
                    .neighbors(cx, cy)
                    .filter(|&(nx, ny)| !seen.is_set(nx, ny)),
            );
        }
    }
    Reveal::Opened(opened)
}

/// True when the unrevealed cells are exactly the mines
pub fn check_win(visited: &Grid<bool>, mines: usize) -> bool {
    visited.iter().filter(|v| !**v).count() == mines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    // 5x5 board with a mine wall on column 2:
    //   . 2 M 2 .
    //   . 3 M 3 .   (rows 1-3)
    //   . 2 M 2 .
    fn walled_board() -> Board {
        Board::from_mines(5, 5, &[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)])
    }

    #[test]
    fn generated_boards_have_exact_mines_and_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        for d in DIFFICULTIES {
            let board = Board::generate_with(d, &mut rng);
            let (w, h, n) = d.params();
            assert_eq!((board.width(), board.height()), (w, h));
            let mines = board.cells().iter().filter(|c| **c == Cell::Mine).count();
            assert_eq!(mines, n);
            assert_eq!(board.mines(), n);

            for y in 0..h {
                for x in 0..w {
                    let expected = board
                        .cells()
                        .neighbors(x, y)
                        .filter(|&(nx, ny)| board.cell(nx, ny) == Some(Cell::Mine))
                        .count() as u8;
                    match board.cell(x, y) {
                        Some(Cell::Mine) => {}
                        Some(Cell::Empty) => assert_eq!(expected, 0),
                        Some(Cell::Number(n)) => assert_eq!(n, expected),
                        None => panic!("cell ({x}, {y}) missing"),
                    }
                }
            }
        }
    }

    #[test]
    fn neighbor_counter_handles_edges() {
        let mut mines = Grid::new(3, 3, false);
        mines.set(0, 0, true);
        mines.set(1, 1, true);
        mines.set(0, 1, true);
        assert_eq!(count_adjacent_mines(&mines, 0, 0), 2);
        assert_eq!(count_adjacent_mines(&mines, 2, 2), 1);
        assert_eq!(count_adjacent_mines(&mines, 1, 0), 3);
        assert_eq!(count_adjacent_mines(&mines, 2, 0), 1);
    }

    #[test]
    fn corner_has_three_neighbors_center_has_eight() {
        let grid = Grid::new(4, 3, 0u8);
        assert_eq!(grid.neighbors(0, 0).count(), 3);
        assert_eq!(grid.neighbors(3, 2).count(), 3);
        assert_eq!(grid.neighbors(1, 0).count(), 5);
        assert_eq!(grid.neighbors(1, 1).count(), 8);
    }

    #[test]
    fn numbered_cell_reveals_only_itself() {
        let board = walled_board();
        let mut visited = board.empty_visited();
        assert_eq!(board.cell(1, 2), Some(Cell::Number(3)));
        assert_eq!(reveal(&board, &mut visited, 1, 2), Reveal::Opened(1));
        assert_eq!(visited.count_set(), 1);
        assert!(visited.is_set(1, 2));
    }

    #[test]
    fn empty_cell_floods_its_region_and_border_only() {
        let board = walled_board();
        let mut visited = board.empty_visited();
        assert_eq!(reveal(&board, &mut visited, 0, 0), Reveal::Opened(10));
        for y in 0..5 {
            assert!(visited.is_set(0, y));
            assert!(visited.is_set(1, y));
            assert!(!visited.is_set(2, y));
            assert!(!visited.is_set(3, y));
            assert!(!visited.is_set(4, y));
        }
    }

    #[test]
    fn flood_stops_at_numbers_inside_open_board() {
        // single mine in the corner: everything but the mine opens from the far corner
        let board = Board::from_mines(4, 4, &[(0, 0)]);
        let mut visited = board.empty_visited();
        assert_eq!(reveal(&board, &mut visited, 3, 3), Reveal::Opened(15));
        assert!(!visited.is_set(0, 0));
        assert!(check_win(&visited, board.mines()));
    }

    #[test]
    fn repeated_reveal_opens_nothing_new() {
        let board = walled_board();
        let mut visited = board.empty_visited();
        reveal(&board, &mut visited, 4, 4);
        assert_eq!(reveal(&board, &mut visited, 4, 4), Reveal::Opened(0));
        assert_eq!(reveal(&board, &mut visited, 3, 0), Reveal::Opened(0));
        assert_eq!(visited.count_set(), 10);
    }

    #[test]
    fn mine_and_outside_reveals() {
        let board = walled_board();
        let mut visited = board.empty_visited();
        assert_eq!(reveal(&board, &mut visited, 2, 3), Reveal::Mine);
        assert!(visited.is_set(2, 3));
        assert_eq!(reveal(&board, &mut visited, 5, 0), Reveal::Outside);
        assert_eq!(visited.count_set(), 1);
    }

    #[test]
    fn win_after_all_71_safe_cells_on_easy() {
        let mut rng = StdRng::seed_from_u64(42);
        let board = Board::generate_with(Difficulty::Easy, &mut rng);
        let mut visited = board.empty_visited();
        let mut safe = 0;
        for y in 0..9 {
            for x in 0..9 {
                if board.cell(x, y) != Some(Cell::Mine) {
                    assert!(!check_win(&visited, board.mines()));
                    visited.set(x, y, true);
                    safe += 1;
                }
            }
        }
        assert_eq!(safe, 71);
        assert!(check_win(&visited, board.mines()));
    }

    #[test]
    fn win_check_counts_unrevealed_cells() {
        let mut visited = Grid::new(3, 3, true);
        assert!(check_win(&visited, 0));
        visited.set(1, 1, false);
        assert!(check_win(&visited, 1));
        assert!(!check_win(&visited, 2));
    }

    #[test]
    fn difficulty_labels_and_keys() {
        for d in DIFFICULTIES {
            assert_eq!(Difficulty::from_label(d.label()), Some(d));
            assert_eq!(Difficulty::from_key(d.key()), Some(d));
        }
        assert_eq!(Difficulty::from_key('4'), None);
        assert_eq!(Difficulty::from_label("Easy"), None);
        assert_eq!(Difficulty::Hard.params(), (30, 16, 99));
    }
}
