//! Batch battle runner.
//!
//! Resolves many independent battles in parallel using rayon: a matchup
//! matrix of every composition against every other, and repeated runs of
//! one battle for determinism checks.

use std::fmt::Write as _;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use skirmish_core::battle::{evaluate_with, BattleConfig, ConclusionReason, Side};
use skirmish_core::data::{compositions, UnitCatalog};
use skirmish_core::error::Result;
use skirmish_core::roster::Player;
use tracing::{debug, info, warn};

/// Configuration for a matchup matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Composition names; every name is played against every name.
    pub compositions: Vec<String>,
    /// Resolver settings.
    pub battle: BattleConfig,
    /// Maximum parallel battles (0 = use rayon default)
    pub parallel_battles: u32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            compositions: compositions::PRESET_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            battle: BattleConfig::default(),
            parallel_battles: 0,
        }
    }
}

/// Outcome of one pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupCell {
    /// Composition on side A.
    pub left: String,
    /// Composition on side B.
    pub right: String,
    /// Winning side.
    pub winner: Side,
    /// Why the battle ended.
    pub reason: ConclusionReason,
    /// Number of turns played.
    pub turns: usize,
    /// Result hash.
    pub result_hash: u64,
}

/// Results of a matchup matrix, row-major in composition order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupMatrix {
    /// Composition names in row/column order.
    pub compositions: Vec<String>,
    /// One cell per ordered pairing.
    pub cells: Vec<MatchupCell>,
    /// Total runtime
    pub duration_seconds: f64,
}

impl MatchupMatrix {
    /// Cell for `left` (side A) against `right` (side B).
    pub fn cell(&self, left: &str, right: &str) -> Option<&MatchupCell> {
        self.cells
            .iter()
            .find(|cell| cell.left == left && cell.right == right)
    }

    /// Number of battles `name` won, on either side.
    pub fn wins(&self, name: &str) -> usize {
        self.cells
            .iter()
            .filter(|cell| match cell.winner {
                Side::A => cell.left == name,
                Side::B => cell.right == name,
            })
            .count()
    }

    /// Win table: rows are side A, columns side B, each cell names the
    /// winning side and the turn count.
    pub fn to_table(&self) -> String {
        let width = self
            .compositions
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(8);

        let mut out = format!("{:width$} |", "A \\ B");
        for name in &self.compositions {
            let _ = write!(out, " {name:^width$} |");
        }
        let _ = write!(out, " {:>4}", "wins");
        out.push('\n');
        out.push_str(&"-".repeat(out.len().saturating_sub(1)));
        out.push('\n');

        for left in &self.compositions {
            let _ = write!(out, "{left:width$} |");
            for right in &self.compositions {
                let text = self.cell(left, right).map_or_else(
                    || "?".to_string(),
                    |cell| format!("{:?} in {}", cell.winner, cell.turns),
                );
                let _ = write!(out, " {text:^width$} |");
            }
            let _ = writeln!(out, " {:>4}", self.wins(left));
        }
        out
    }
}

/// Run every composition against every composition in parallel.
///
/// All rosters are built before any battle starts, so an unknown name or
/// catalog entry fails the whole run.
pub fn run_matrix(config: &MatrixConfig, catalog: &UnitCatalog) -> Result<MatchupMatrix> {
    let start = Instant::now();

    let rosters: Vec<(Player, Player)> = config
        .compositions
        .iter()
        .map(|name| {
            let as_a = compositions::named(name, 1)?.build_board(catalog)?;
            let as_b = compositions::named(name, 2)?.build_board(catalog)?;
            Ok((
                Player::new("p1", name.clone(), as_a),
                Player::new("p2", name.clone(), as_b),
            ))
        })
        .collect::<Result<_>>()?;

    let n = rosters.len();
    info!("Starting matchup matrix: {} compositions, {} battles", n, n * n);

    let play = || -> Vec<MatchupCell> {
        (0..n * n)
            .into_par_iter()
            .map(|i| {
                let (left, right) = (i / n, i % n);
                let a = &rosters[left].0;
                let b = &rosters[right].1;
                let result = evaluate_with(a, b, config.battle);
                debug!(
                    left = %a.name,
                    right = %b.name,
                    winner = ?result.winning_side,
                    turns = result.turn_count(),
                    "Matchup resolved"
                );
                MatchupCell {
                    left: a.name.clone(),
                    right: b.name.clone(),
                    winner: result.winning_side,
                    reason: result.reason,
                    turns: result.turn_count(),
                    result_hash: result.state_hash(),
                }
            })
            .collect()
    };

    let cells = if config.parallel_battles > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_battles as usize)
            .build()
        {
            Ok(pool) => pool.install(play),
            Err(e) => {
                warn!("Failed to build thread pool: {}, using global pool", e);
                play()
            }
        }
    } else {
        play()
    };

    let duration_seconds = start.elapsed().as_secs_f64();
    info!(
        "Matrix complete: {} battles in {:.3}s",
        cells.len(),
        duration_seconds
    );

    Ok(MatchupMatrix {
        compositions: config.compositions.clone(),
        cells,
        duration_seconds,
    })
}

/// Outcome of a determinism check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// Result hash of every run.
    pub hashes: Vec<u64>,
    /// Whether every run produced the same hash.
    pub deterministic: bool,
}

/// Resolve the same battle `runs` times in parallel and compare hashes.
pub fn verify_determinism(
    player_a: &Player,
    player_b: &Player,
    config: BattleConfig,
    runs: u32,
) -> VerifyOutcome {
    let hashes: Vec<u64> = (0..runs)
        .into_par_iter()
        .map(|_| evaluate_with(player_a, player_b, config).state_hash())
        .collect();
    let deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    if !deterministic {
        warn!(?hashes, "Battle produced differing results");
    }
    VerifyOutcome {
        hashes,
        deterministic,
    }
}
