use crate::types::Side;

/// Rank delta of a single pawn step
pub const fn pawn_forward(s: Side) -> i8 {
    match s {
        Side::White => -1,
        Side::Black => 1,
    }
}

pub const fn pawn_start_rank(s: Side) -> i8 {
    match s {
        Side::White => 6,
        Side::Black => 1,
    }
}

pub const fn promotion_rank(s: Side) -> i8 {
    match s {
        Side::White => 0,
        Side::Black => 7,
    }
}

pub const fn back_rank(s: Side) -> i8 {
    match s {
        Side::White => 7,
        Side::Black => 0,
    }
}

pub const DIAG_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const LINE_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const ALL_DIRS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = ALL_DIRS;
