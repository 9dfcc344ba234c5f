//! Battle reports in text, JSON and RON form.

use serde::Serialize;
use skirmish_core::battle::{BattleResult, BattleTurn, ConclusionReason};
use skirmish_core::roster::Player;
use thiserror::Error;

/// Output format for battle reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable turn log.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Pretty-printed RON.
    Ron,
}

/// Error type for report rendering.
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization failed.
    #[error("Failed to serialize report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// RON serialization failed.
    #[error("Failed to serialize report as RON: {0}")]
    Ron(#[from] ron::Error),
}

/// A resolved battle together with its inputs.
#[derive(Debug, Clone, Serialize)]
pub struct BattleReport<'a> {
    /// Scenario name.
    pub scenario: &'a str,
    /// Side A before the battle.
    pub player_a: &'a Player,
    /// Side B before the battle.
    pub player_b: &'a Player,
    /// The outcome.
    pub result: &'a BattleResult<Player>,
    /// [`BattleResult::state_hash`] of the outcome.
    pub result_hash: u64,
}

impl<'a> BattleReport<'a> {
    /// Create a report.
    pub fn new(
        scenario: &'a str,
        player_a: &'a Player,
        player_b: &'a Player,
        result: &'a BattleResult<Player>,
    ) -> Self {
        Self {
            scenario,
            player_a,
            player_b,
            result,
            result_hash: result.state_hash(),
        }
    }

    /// Render in the given format.
    pub fn render(&self, format: OutputFormat) -> Result<String, ReportError> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Ron => Ok(ron::ser::to_string_pretty(
                self,
                ron::ser::PrettyConfig::default(),
            )?),
        }
    }

    /// Plain-text turn log with a summary line.
    pub fn to_text(&self) -> String {
        let mut out = format!("Battle: {}\n", self.scenario);
        for turn in &self.result.turns {
            out.push_str(&describe_turn(turn));
            out.push('\n');
        }
        out.push_str(&summary_line(self.result));
        out.push('\n');
        out.push_str(&format!("Result hash: {:016x}\n", self.result_hash));
        out
    }
}

/// One-line description of a turn.
pub fn describe_turn(turn: &BattleTurn) -> String {
    format!(
        "Turn {:>3}: [{}] {} @ {} hits {} @ {} for {} (hp {}/{})",
        turn.turn_number,
        turn.attacking_player_id,
        turn.attacker.id(),
        turn.attacker_position,
        turn.defender.id(),
        turn.defender_position,
        turn.damage,
        turn.defender_hp_after,
        turn.defender.max_hp(),
    )
}

/// Winner and conclusion summary.
pub fn summary_line(result: &BattleResult<Player>) -> String {
    let reason = match result.reason {
        ConclusionReason::Elimination => "elimination",
        ConclusionReason::TurnLimit => "turn limit",
        ConclusionReason::Stalemate => "stalemate",
    };
    format!(
        "Winner: {} ({}) by {} after {} turns",
        result.winner.name,
        result.winner.id,
        reason,
        result.turns.len()
    )
}
