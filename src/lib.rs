#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod attack;
pub mod board;
pub mod board_display;
pub mod castling;
pub mod color;
pub mod coord;
pub mod end_state;
pub mod error;
pub mod fen;
pub mod fuzz;
pub mod game;
pub mod grid;
pub mod lan;
pub mod piece;
pub mod record;
pub mod repl;
pub mod rules;

pub use game::Game;
