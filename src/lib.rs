//! Snakefall: a terminal arcade game crossing Snake with Tetris.
//!
//! The snake falls as a rigid bar, eats to grow, and locks into the terrain
//! on any collision; full rows clear Tetris-style. The simulation core
//! ([`grid`], [`snake`], [`game`]) is pure state driven by
//! [`game::GameSession::tick`]; terminal rendering and input live in the
//! remaining modules.

pub mod config;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod ui;
