//! Hex Tactics - movement and targeting engine for a turn-based hex-grid game

pub mod board;
pub mod core;
