//! Property-based tests for the game rules and the stored format.
//!
//! Boards and sessions are generated by playing random legal moves from the
//! empty board, so every input is one real play could reach.

use proptest::prelude::*;
use shared_connect_four::game::{
    Board, Cell, DropError, GameSession, GameStatus, MoveError, Player, PlayerNames, COLS,
    DRAW_MESSAGE, ROWS,
};
use shared_connect_four::sync::{GameId, MemoryStore, SyncChannel};

fn names() -> PlayerNames {
    PlayerNames::new("Ada", "Grace")
}

/// Piece of the `turn`-th drop when players alternate from player one.
fn cell_for(turn: usize) -> Cell {
    if turn % 2 == 0 {
        Cell::One
    } else {
        Cell::Two
    }
}

fn open_columns(board: &Board) -> Vec<usize> {
    (0..COLS).filter(|&col| !board.is_column_full(col)).collect()
}

/// Random column picks. Each pick is reduced modulo the columns still open.
fn arb_picks() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0usize..COLS, 0..=ROWS * COLS)
}

/// Session reached by legal moves; play stops at the first win or draw.
fn arb_session() -> impl Strategy<Value = GameSession> {
    arb_picks().prop_map(|picks| {
        let mut session = GameSession::initial(names());
        for pick in picks {
            let legal = session.legal_columns();
            if legal.is_empty() {
                break;
            }
            session = session.apply_move(legal[pick % legal.len()]).unwrap().session;
        }
        session
    })
}

/// Board with 41 alternating drops that ignore wins, plus the one column
/// still open. The last drop belongs to player two.
fn arb_one_cell_left() -> impl Strategy<Value = (Board, usize)> {
    proptest::collection::vec(0usize..COLS, ROWS * COLS - 1).prop_map(|picks| {
        let mut board = Board::new();
        for (turn, pick) in picks.iter().enumerate() {
            let open = open_columns(&board);
            board.drop_piece(open[pick % open.len()], cell_for(turn)).unwrap();
        }
        let last = open_columns(&board)[0];
        (board, last)
    })
}

fn round_trip(session: &GameSession) -> GameSession {
    let game = GameId::parse("k3x9q2ab").unwrap();
    let mut channel = SyncChannel::new(MemoryStore::new(), game, PlayerNames::default());
    channel.persist(session).unwrap();
    channel.persist_names(session.names()).unwrap();
    channel.load()
}

proptest! {
    /// Every drop lands in the lowest empty cell and no piece ever floats.
    /// Drops into a full column fail and leave the board as it was.
    #[test]
    fn prop_drop_keeps_gravity(picks in proptest::collection::vec(0usize..COLS, 0..80)) {
        let mut board = Board::new();
        for (turn, col) in picks.into_iter().enumerate() {
            let before = board;
            let lowest_empty = (0..ROWS).rev().find(|&row| before.get(row, col) == Cell::Empty);

            match board.drop_piece(col, cell_for(turn)) {
                Ok(placed) => {
                    prop_assert_eq!(Some(placed.row), lowest_empty);
                    prop_assert_eq!(board.get(placed.row, col), cell_for(turn));
                }
                Err(err) => {
                    prop_assert_eq!(err, DropError::ColumnFull);
                    prop_assert_eq!(lowest_empty, None);
                    prop_assert_eq!(board, before);
                }
            }
            prop_assert!(board.is_settled());
        }
    }

    /// A full column rejects further drops at board and session level.
    #[test]
    fn prop_full_column_rejects_without_change(picks in arb_picks(), col in 0usize..COLS) {
        let mut board = Board::new();
        for (turn, pick) in picks.iter().enumerate() {
            let open = open_columns(&board);
            if open.is_empty() {
                break;
            }
            board.drop_piece(open[pick % open.len()], cell_for(turn)).unwrap();
        }
        let mut turn = 0;
        while !board.is_column_full(col) {
            board.drop_piece(col, cell_for(turn)).unwrap();
            turn += 1;
        }

        let before = board;
        prop_assert_eq!(board.drop_piece(col, Cell::One), Err(DropError::ColumnFull));
        prop_assert_eq!(board, before);

        let session = GameSession::from_parts(board, Player::One, false, String::new(), names());
        prop_assert_eq!(session.apply_move(col), Err(MoveError::ColumnFull));
    }

    /// The move that fills the board wins if it completes a line, and only
    /// otherwise draws.
    #[test]
    fn prop_win_takes_precedence_over_draw((board, last) in arb_one_cell_left()) {
        let session = GameSession::from_parts(board, Player::Two, false, String::new(), names());
        let applied = session.apply_move(last).unwrap();
        let next = &applied.session;

        prop_assert!(next.board().is_full());
        prop_assert!(next.is_over());
        if next.board().check_win(applied.placed.row, applied.placed.col) {
            prop_assert_eq!(next.status(), GameStatus::Won(Player::Two));
            prop_assert_eq!(next.message(), "Winner: Grace");
            prop_assert!(applied.celebrate);
        } else {
            prop_assert_eq!(next.status(), GameStatus::Drawn);
            prop_assert_eq!(next.message(), DRAW_MESSAGE);
            prop_assert!(!applied.celebrate);
        }
    }

    /// Loading what was persisted gives back the same session.
    #[test]
    fn prop_persist_load_round_trips(session in arb_session()) {
        prop_assert_eq!(round_trip(&session), session);
    }

    /// Round trip of sessions finished by filling the board, won or drawn.
    #[test]
    fn prop_persist_load_round_trips_finished_games((board, last) in arb_one_cell_left()) {
        let session = GameSession::from_parts(board, Player::Two, false, String::new(), names())
            .apply_move(last)
            .unwrap()
            .session;
        prop_assert_eq!(round_trip(&session), session);
    }
}
