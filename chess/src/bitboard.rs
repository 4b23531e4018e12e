pub use duelchess_base::bitboard::*;
