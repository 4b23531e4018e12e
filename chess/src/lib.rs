//! # Chess with duels instead of captures
//!
//! `duelchess` implements a chess variant where a piece moving onto an enemy piece doesn't
//! capture it outright. Instead, the two pieces fight a short real-time duel in an arena,
//! shooting projectiles at each other, and only the survivor stays on the board.
//!
//! The crate contains:
//!
//! - the board and the movement rules of the pieces ([`Board`], [`movegen`]),
//! - the duel simulation ([`arena`]),
//! - piece stats and their configuration ([`stats`], [`config`]),
//! - a controller gluing it all together ([`Game`]).
//!
//! # Example
//!
//! ```
//! # use duelchess::{Board, stats::DefaultStats, types::Square, movegen};
//! let board = Board::initial(&DefaultStats);
//! let moves = movegen::valid_moves(&board, Square::new(1, 7));
//! assert_eq!(moves.len(), 2);
//! ```
//!
//! Running a duel:
//!
//! ```
//! # use duelchess::{Board, MoveOutcome, stats::DefaultStats, types::Square};
//! # use duelchess::arena::{ArenaConfig, Duel};
//! let mut board: Board = "8/8/p7/8/8/8/8/R7".parse().unwrap();
//! let MoveOutcome::Attack(e) = board.make_move(Square::new(0, 7), Square::new(0, 2)).unwrap() else {
//!     panic!("expected an attack");
//! };
//! let mut duel = Duel::new(e, ArenaConfig::default());
//! while !duel.advance(1.0 / 60.0).is_over() {}
//! let settlement = board.settle(duel.finish().unwrap()).unwrap();
//! assert_eq!(board.to_string(), "8/8/R7/8/8/8/8/8");
//! assert!(!settlement.king_fallen);
//! ```

pub mod arena;
pub mod bitboard;
pub mod board;
pub mod config;
pub mod game;
pub mod geometry;
pub mod movegen;
pub mod piece;
pub mod score;
pub mod stats;
pub mod types;

pub use bitboard::Bitboard;
pub use board::{Board, Engagement, MoveOutcome, Settlement};
pub use game::{ClickEvent, Game, Outcome};
pub use piece::Piece;
pub use types::{PieceKind, Side, Square};
