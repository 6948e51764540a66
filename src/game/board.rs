pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of same-mark cells in a line that wins the game.
pub const CONNECT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    One,
    Two,
}

impl Cell {
    /// Numeric mark used in the persisted board (0 = empty, 1/2 = player).
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::One => 1,
            Cell::Two => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::One),
            2 => Some(Cell::Two),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

/// Coordinates of a piece that has just been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    #[error("column is full")]
    ColumnFull,
    #[error("column is out of range")]
    InvalidColumn,
}

/// The four line directions as (row step, col step): horizontal, vertical, `\` and `/`.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Build a board from raw rows. Does not check gravity; see [`Board::is_settled`].
    pub fn from_cells(cells: [[Cell; COLS]; ROWS]) -> Self {
        Board { cells }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[Cell; COLS]; ROWS] {
        &self.cells
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// Drop a piece in a column. Scans from the bottom row up and fills the
    /// first empty cell; the board is left untouched on error.
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<Placement, DropError> {
        if col >= COLS {
            return Err(DropError::InvalidColumn);
        }

        let row = (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][col] == Cell::Empty)
            .ok_or(DropError::ColumnFull)?;

        self.cells[row][col] = cell;
        Ok(Placement { row, col })
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// True when no empty cell remains. Only meaningful once a win has been ruled out.
    pub fn is_draw(&self) -> bool {
        self.is_full()
    }

    /// Check if the piece at (row, col) is part of a line of at least four.
    ///
    /// Only lines through the given cell are inspected, so this is meant to be
    /// called with the coordinates of the piece that was just placed.
    pub fn check_win(&self, row: usize, col: usize) -> bool {
        if row >= ROWS || col >= COLS {
            return false;
        }
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }

        AXES.iter().any(|&(dr, dc)| {
            let run = 1
                + self.count_run(row, col, dr, dc, cell)
                + self.count_run(row, col, -dr, -dc, cell);
            run >= CONNECT
        })
    }

    /// Count consecutive `cell` marks stepping away from (row, col), excluding the start.
    fn count_run(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    /// True when every occupied cell sits on the bottom row or on another piece.
    pub fn is_settled(&self) -> bool {
        (0..COLS).all(|col| {
            (0..ROWS - 1).all(|row| {
                self.cells[row][col] == Cell::Empty || self.cells[row + 1][col] != Cell::Empty
            })
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert!(!board.is_draw());
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        let placed = board.drop_piece(3, Cell::One).unwrap();
        assert_eq!(placed, Placement { row: 5, col: 3 });
        assert_eq!(board.get(5, 3), Cell::One);

        let placed = board.drop_piece(3, Cell::Two).unwrap();
        assert_eq!(placed.row, 4);
        assert_eq!(board.get(4, 3), Cell::Two);
    }

    #[test]
    fn test_drop_keeps_gravity() {
        let mut board = Board::new();
        let columns = [0, 3, 3, 6, 3, 0, 2, 2, 5, 3, 3, 3];
        for (i, &col) in columns.iter().enumerate() {
            let cell = if i % 2 == 0 { Cell::One } else { Cell::Two };
            board.drop_piece(col, cell).unwrap();
            assert!(board.is_settled());
        }
    }

    #[test]
    fn test_column_full_leaves_board_unchanged() {
        let mut board = Board::new();
        for i in 0..ROWS {
            let cell = if i % 2 == 0 { Cell::One } else { Cell::Two };
            board.drop_piece(0, cell).unwrap();
        }

        let before = board;
        assert!(board.is_column_full(0));
        assert_eq!(board.drop_piece(0, Cell::Two), Err(DropError::ColumnFull));
        assert_eq!(board, before);
        assert_eq!(board.drop_piece(0, Cell::One), Err(DropError::ColumnFull));
        assert_eq!(board, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(board.drop_piece(7, Cell::One), Err(DropError::InvalidColumn));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::One).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.is_draw());
    }

    #[test]
    fn test_horizontal_win() {
        let mut board = Board::new();
        for col in 0..4 {
            board.drop_piece(col, Cell::One).unwrap();
        }
        assert!(board.check_win(5, 2));
        assert!(board.check_win(5, 0));
    }

    #[test]
    fn test_vertical_win() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(3, Cell::Two).unwrap();
        }
        assert!(board.check_win(2, 3));
    }

    #[test]
    fn test_diagonal_up_win() {
        let mut board = Board::new();
        // Create diagonal / pattern
        board.drop_piece(0, Cell::One).unwrap();

        board.drop_piece(1, Cell::Two).unwrap();
        board.drop_piece(1, Cell::One).unwrap();

        board.drop_piece(2, Cell::Two).unwrap();
        board.drop_piece(2, Cell::Two).unwrap();
        board.drop_piece(2, Cell::One).unwrap();

        board.drop_piece(3, Cell::Two).unwrap();
        board.drop_piece(3, Cell::Two).unwrap();
        board.drop_piece(3, Cell::Two).unwrap();
        let placed = board.drop_piece(3, Cell::One).unwrap();

        assert!(board.check_win(placed.row, placed.col));
    }

    #[test]
    fn test_diagonal_down_win() {
        let mut board = Board::new();
        // Create diagonal \ pattern
        board.drop_piece(6, Cell::One).unwrap();

        board.drop_piece(5, Cell::Two).unwrap();
        board.drop_piece(5, Cell::One).unwrap();

        board.drop_piece(4, Cell::Two).unwrap();
        board.drop_piece(4, Cell::Two).unwrap();
        board.drop_piece(4, Cell::One).unwrap();

        board.drop_piece(3, Cell::Two).unwrap();
        board.drop_piece(3, Cell::Two).unwrap();
        board.drop_piece(3, Cell::Two).unwrap();
        let placed = board.drop_piece(3, Cell::One).unwrap();

        assert!(board.check_win(placed.row, placed.col));
    }

    #[test]
    fn test_win_detected_from_middle_of_line() {
        let mut board = Board::new();
        board.drop_piece(0, Cell::One).unwrap();
        board.drop_piece(1, Cell::One).unwrap();
        board.drop_piece(3, Cell::One).unwrap();
        let placed = board.drop_piece(2, Cell::One).unwrap();
        assert!(board.check_win(placed.row, placed.col));
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Cell::One).unwrap();
        }
        assert!(!board.check_win(5, 1));
    }

    #[test]
    fn test_no_win_when_line_is_broken_by_opponent() {
        let mut board = Board::new();
        board.drop_piece(0, Cell::One).unwrap();
        board.drop_piece(1, Cell::One).unwrap();
        board.drop_piece(2, Cell::Two).unwrap();
        board.drop_piece(3, Cell::One).unwrap();
        let placed = board.drop_piece(4, Cell::One).unwrap();
        assert!(!board.check_win(placed.row, placed.col));

        let mut board = Board::new();
        board.drop_piece(5, Cell::One).unwrap();
        board.drop_piece(5, Cell::One).unwrap();
        board.drop_piece(5, Cell::Two).unwrap();
        board.drop_piece(5, Cell::One).unwrap();
        let placed = board.drop_piece(5, Cell::One).unwrap();
        assert!(!board.check_win(placed.row, placed.col));
    }

    #[test]
    fn test_check_win_on_empty_cell_is_false() {
        let board = Board::new();
        assert!(!board.check_win(5, 0));
        assert!(!board.check_win(ROWS, 0));
    }

    #[test]
    fn test_is_settled_rejects_floating_piece() {
        let mut cells = [[Cell::Empty; COLS]; ROWS];
        cells[2][4] = Cell::Two;
        assert!(!Board::from_cells(cells).is_settled());

        cells[3][4] = Cell::One;
        cells[4][4] = Cell::One;
        cells[5][4] = Cell::Two;
        assert!(Board::from_cells(cells).is_settled());
    }

    #[test]
    fn test_cell_codes() {
        for cell in [Cell::Empty, Cell::One, Cell::Two] {
            assert_eq!(Cell::from_code(cell.code()), Some(cell));
        }
        assert_eq!(Cell::from_code(3), None);
    }
}
