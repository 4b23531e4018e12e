pub use duelchess_base::geometry::*;
