#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::{
    io::{self, IsTerminal, stderr, stdin, stdout},
    process::ExitCode,
};

use chess_oracle::{Game, color::Color, fuzz::fuzz, repl::repl};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Chess rules engine with a console board")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}
#[derive(Debug, Subcommand)]
enum Command {
    /// Play on the console
    Play {
        /// Starting position in FEN
        #[arg(long)]
        fen: Option<String>,
        /// View the board from black's side
        #[arg(long)]
        black: bool,
    },
    /// Compare legal moves against the `chess` crate over random games
    Fuzz {
        /// Seed for the random walk, random if omitted
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 100_000)]
        plies: u32,
    },
}
fn play(fen: Option<&str>, black: bool) -> ExitCode {
    let game = match fen.map(Game::from_fen).transpose() {
        Ok(game) => game.unwrap_or_default(),
        Err(err) => {
            error!(%err, "invalid starting position");
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let view = if black { Color::Black } else { Color::White };
    let colored = stdout().is_terminal();
    match repl(
        &game,
        view,
        colored,
        stdin().lock(),
        stdout().lock(),
        stderr().lock(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        None => play(None, false),
        Some(Command::Play { fen, black }) => play(fen.as_deref(), black),
        Some(Command::Fuzz { seed, plies }) => {
            let seed = seed.unwrap_or_else(rand::random);
            match fuzz(seed, plies) {
                Ok(()) => {
                    println!("{plies} plies agree with the reference (seed {seed})");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("Error (seed {seed}): {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
