//! Battle records and turn-log playback.
//!
//! A [`BattleRecord`] stores the inputs of a battle plus a hash of its
//! result, so the battle can be re-resolved and checked later. A
//! [`TurnPlayer`] walks a turn log and rebuilds both boards turn by turn
//! from the recorded defender snapshots alone, without resolving combat.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::{evaluate_with, BattleConfig, BattleResult, BattleTurn, Side};
use crate::board::Board;
use crate::error::{BattleError, Result};
use crate::roster::Player;

/// Record file format version for compatibility.
///
/// `result_hash` comes from [`BattleResult::state_hash`], which uses the
/// standard library's `DefaultHasher`. Its output is stable within one
/// toolchain but may change between Rust releases, so a record can fail
/// [`BattleRecord::verify`] after a toolchain upgrade even though the
/// battle itself resolves identically.
pub const RECORD_VERSION: u32 = 1;

/// Inputs and outcome fingerprint of one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Record format version.
    pub version: u32,
    /// Side A as it was before the battle.
    pub player_a: Player,
    /// Side B as it was before the battle.
    pub player_b: Player,
    /// Resolver settings used.
    pub config: BattleConfig,
    /// Number of turns in the result.
    pub turn_count: usize,
    /// Side that won.
    pub winning_side: Side,
    /// [`BattleResult::state_hash`] of the result.
    pub result_hash: u64,
}

impl BattleRecord {
    /// Record a battle from its inputs and result.
    #[must_use]
    pub fn new(
        player_a: &Player,
        player_b: &Player,
        config: BattleConfig,
        result: &BattleResult<Player>,
    ) -> Self {
        Self {
            version: RECORD_VERSION,
            player_a: player_a.clone(),
            player_b: player_b.clone(),
            config,
            turn_count: result.turn_count(),
            winning_side: result.winning_side,
            result_hash: result.state_hash(),
        }
    }

    /// Resolve a battle and record it.
    #[must_use]
    pub fn capture(
        player_a: &Player,
        player_b: &Player,
        config: BattleConfig,
    ) -> (Self, BattleResult<Player>) {
        let result = evaluate_with(player_a, player_b, config);
        (Self::new(player_a, player_b, config, &result), result)
    }

    /// Re-resolve the recorded battle.
    #[must_use]
    pub fn resolve(&self) -> BattleResult<Player> {
        evaluate_with(&self.player_a, &self.player_b, self.config)
    }

    /// Whether re-resolving reproduces the recorded result hash.
    #[must_use]
    pub fn verify(&self) -> bool {
        let result = self.resolve();
        let matches = result.state_hash() == self.result_hash;
        if !matches {
            tracing::warn!(
                expected = self.result_hash,
                actual = result.state_hash(),
                "Battle record hash mismatch"
            );
        }
        matches
    }

    /// Save the record to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| BattleError::InvalidState(format!("Failed to serialize record: {e}")))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| BattleError::InvalidState(format!("Failed to write record file: {e}")))?;
        Ok(())
    }

    /// Load a record from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails, or the
    /// record was written by a different format version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| BattleError::InvalidState(format!("Failed to read record file: {e}")))?;
        let record: Self = bincode::deserialize(&bytes).map_err(|e| {
            BattleError::InvalidState(format!("Failed to deserialize record: {e}"))
        })?;

        if record.version != RECORD_VERSION {
            return Err(BattleError::InvalidState(format!(
                "Record version mismatch: expected {}, got {}",
                RECORD_VERSION, record.version
            )));
        }

        Ok(record)
    }
}

/// Turn-log playback controller.
///
/// Starts from the two initial boards and applies one recorded turn per
/// [`TurnPlayer::advance`]. Pacing is left to the caller.
#[derive(Debug, Clone)]
pub struct TurnPlayer {
    turns: Vec<BattleTurn>,
    initial: [Board; 2],
    boards: [Board; 2],
    applied: usize,
    /// Whether playback is paused.
    pub paused: bool,
}

impl TurnPlayer {
    /// Create a player over `turns`, starting from the given boards.
    #[must_use]
    pub fn new(board_a: &Board, board_b: &Board, turns: Vec<BattleTurn>) -> Self {
        let initial = [board_a.clone(), board_b.clone()];
        Self {
            turns,
            boards: initial.clone(),
            initial,
            applied: 0,
            paused: false,
        }
    }

    /// Create a player for a resolved battle between `player_a` and
    /// `player_b`.
    #[must_use]
    pub fn for_battle(player_a: &Player, player_b: &Player, result: &BattleResult<Player>) -> Self {
        Self::new(&player_a.board, &player_b.board, result.turns.clone())
    }

    /// Apply the next turn.
    ///
    /// Returns the applied turn, or `None` when paused or finished.
    pub fn advance(&mut self) -> Option<&BattleTurn> {
        if self.paused || self.is_finished() {
            return None;
        }
        self.apply_next();
        self.turns.get(self.applied - 1)
    }

    fn apply_next(&mut self) {
        let turn = &self.turns[self.applied];
        let defending = turn.attacking_side.opponent().index();
        self.boards[defending] =
            self.boards[defending].replaced(turn.defender_position, Some(turn.defender.clone()));
        self.applied += 1;
    }

    /// Jump to the state after `turn` turns (clamped to the log length).
    pub fn seek(&mut self, turn: usize) {
        let target = turn.min(self.turns.len());
        if target < self.applied {
            self.boards = self.initial.clone();
            self.applied = 0;
        }
        while self.applied < target {
            self.apply_next();
        }
    }

    /// Number of turns applied so far.
    #[must_use]
    pub const fn current_turn(&self) -> usize {
        self.applied
    }

    /// Most recently applied turn.
    #[must_use]
    pub fn last_turn(&self) -> Option<&BattleTurn> {
        self.applied.checked_sub(1).and_then(|i| self.turns.get(i))
    }

    /// Total number of turns in the log.
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Current board of one side.
    #[must_use]
    pub fn board(&self, side: Side) -> &Board {
        &self.boards[side.index()]
    }

    /// Check if every turn has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.applied >= self.turns.len()
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Get progress as a percentage (0-100).
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.turns.is_empty() {
            100.0
        } else {
            (self.applied as f64 / self.turns.len() as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{compositions, UnitCatalog};

    fn players() -> (Player, Player) {
        let catalog = UnitCatalog::default();
        (
            Player::new("p1", "Alice", compositions::mixed(&catalog, 1).unwrap()),
            Player::new("p2", "Bob", compositions::balanced(&catalog, 2).unwrap()),
        )
    }

    #[test]
    fn test_record_capture() {
        let (a, b) = players();
        let (record, result) = BattleRecord::capture(&a, &b, BattleConfig::default());
        assert_eq!(record.version, RECORD_VERSION);
        assert_eq!(record.turn_count, result.turns.len());
        assert_eq!(record.winning_side, result.winning_side);
        assert_eq!(record.result_hash, result.state_hash());
        assert!(record.verify());
    }

    #[test]
    fn test_record_detects_tampering() {
        let (a, b) = players();
        let (mut record, _) = BattleRecord::capture(&a, &b, BattleConfig::default());
        record.result_hash ^= 1;
        assert!(!record.verify());
    }

    #[test]
    fn test_record_save_load() {
        let (a, b) = players();
        let (record, _) = BattleRecord::capture(&a, &b, BattleConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battle.rec");
        record.save(&path).unwrap();

        let loaded = BattleRecord::load(&path).unwrap();
        assert_eq!(loaded, record);
        assert!(loaded.verify());
    }

    #[test]
    fn test_record_version_mismatch() {
        let (a, b) = players();
        let (mut record, _) = BattleRecord::capture(&a, &b, BattleConfig::default());
        record.version = RECORD_VERSION + 1;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.rec");
        record.save(&path).unwrap();

        let err = BattleRecord::load(&path).unwrap_err();
        assert!(matches!(err, BattleError::InvalidState(ref msg) if msg.contains("version")));
    }

    #[test]
    fn test_player_rebuilds_final_boards() {
        let (a, b) = players();
        let result = evaluate_with(&a, &b, BattleConfig::default());
        let mut player = TurnPlayer::for_battle(&a, &b, &result);

        let mut count = 0;
        while player.advance().is_some() {
            count += 1;
        }
        assert_eq!(count, result.turns.len());
        assert!(player.is_finished());
        assert_eq!(player.board(Side::A), &result.side(Side::A).board);
        assert_eq!(player.board(Side::B), &result.side(Side::B).board);
    }

    #[test]
    fn test_player_seek_and_progress() {
        let (a, b) = players();
        let result = evaluate_with(&a, &b, BattleConfig::default());
        let mut player = TurnPlayer::for_battle(&a, &b, &result);
        assert_eq!(player.progress_percent(), 0.0);
        assert!(player.last_turn().is_none());

        player.seek(2);
        assert_eq!(player.current_turn(), 2);
        assert_eq!(player.last_turn(), result.turns.get(1));

        let mut stepped = TurnPlayer::for_battle(&a, &b, &result);
        stepped.advance();
        stepped.advance();
        assert_eq!(stepped.board(Side::A), player.board(Side::A));
        assert_eq!(stepped.board(Side::B), player.board(Side::B));

        player.seek(0);
        assert_eq!(player.board(Side::A), &a.board);

        player.seek(usize::MAX);
        assert!(player.is_finished());
        assert!((player.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_pause() {
        let (a, b) = players();
        let result = evaluate_with(&a, &b, BattleConfig::default());
        let mut player = TurnPlayer::for_battle(&a, &b, &result);

        player.toggle_pause();
        assert!(player.advance().is_none());
        assert_eq!(player.current_turn(), 0);

        player.toggle_pause();
        assert!(player.advance().is_some());
    }

    #[test]
    fn test_empty_log_is_finished() {
        let player = TurnPlayer::new(&Board::new(), &Board::new(), Vec::new());
        assert!(player.is_finished());
        assert!((player.progress_percent() - 100.0).abs() < f64::EPSILON);
    }
}
