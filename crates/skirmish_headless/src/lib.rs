//! Headless battle runner for balance testing and CI verification.
//!
//! This crate drives [`skirmish_core`] without any interactive frontend:
//!
//! - **Reports**: Resolve a scenario and print the turn log as text, JSON or RON
//! - **Playback**: Replay a turn log frame by frame on an ASCII board
//! - **Matchup tables**: Every built-in composition against every other, in parallel
//! - **Verification**: Check that battles and saved records reproduce identical hashes
//!
//! Reports go to stdout, logs to stderr.
//!
//! # Example
//!
//! ```bash
//! # Resolve two built-in compositions
//! cargo run -p skirmish_headless -- run --a mixed --b balanced
//!
//! # Resolve a scenario file and save a record
//! cargo run -p skirmish_headless -- run --scenario scenarios/duel.ron --record duel.bin
//!
//! # Check a saved record
//! cargo run -p skirmish_headless -- replay --file duel.bin --verify
//! ```

pub mod ascii_board;
pub mod batch;
pub mod report;
pub mod scenario;

pub use ascii_board::{play, render_boards, AsciiConfig};
pub use batch::{run_matrix, verify_determinism, MatchupCell, MatchupMatrix, MatrixConfig};
pub use report::{BattleReport, OutputFormat};
pub use scenario::{Scenario, ScenarioError};
