//! # Base types for duelchess
//!
//! This is an auxiliary crate for `duelchess`, which contains the board coordinates, sides, piece
//! kinds and the side-relative geometry. It has no game logic of its own.
//!
//! Normally you don't want to use this crate directly. Use `duelchess` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
