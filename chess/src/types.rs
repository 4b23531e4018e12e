pub use duelchess_base::types::*;
