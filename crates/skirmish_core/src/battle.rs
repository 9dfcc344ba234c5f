//! The battle resolver.
//!
//! A battle alternates attacks between side A and side B until one side has
//! no living unit. Each attack is recorded as a [`BattleTurn`]; the full log
//! plus the final state of both sides forms the [`BattleResult`].
//!
//! # Determinism
//!
//! Resolution is a pure function of its inputs:
//! - No randomness (damage is exactly the attacker's attack value)
//! - Fixed selection order (front row before back row, left to right)
//! - Inputs are cloned before anything changes, so callers keep their rosters
//!
//! # Example
//!
//! ```
//! use skirmish_core::battle::{evaluate_duel, Side};
//! use skirmish_core::unit::Unit;
//!
//! let warrior = Unit::with_hp("warrior", 3, 3, 2).unwrap();
//! let knight = Unit::with_hp("knight", 4, 4, 1).unwrap();
//!
//! let result = evaluate_duel(&warrior, &knight);
//! let damage: Vec<u32> = result.turns.iter().map(|t| t.damage).collect();
//! assert_eq!(damage, vec![2, 1, 2]);
//! assert_eq!(result.winning_side, Side::A);
//! assert_eq!(result.loser.hp(), 0);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::position::BoardPosition;
use crate::roster::Player;
use crate::targeting;
use crate::unit::Unit;

/// Default bound on the number of turns in one battle.
pub const DEFAULT_MAX_TURNS: u32 = 10_000;

/// One of the two sides of a battle. Side A attacks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Side {
    /// The first roster passed to the resolver.
    #[default]
    A,
    /// The second roster passed to the resolver.
    B,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// Resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Side checked first when deciding the winner.
    ///
    /// After an elimination this side wins only if it still has a living
    /// unit, so when both sides are defeated its opponent wins. When the
    /// battle is cut off, this side wins equal hp totals.
    pub tie_break: Side,
    /// Maximum number of turns before the battle is cut off (0 = unlimited).
    ///
    /// Units may have zero attack. Without a limit, a battle in which
    /// neither side's acting unit can deal damage ends as a
    /// [`ConclusionReason::Stalemate`], and the turn counter caps at
    /// `u32::MAX`.
    pub max_turns: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            tie_break: Side::A,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}

/// Why a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConclusionReason {
    /// A side ran out of living units.
    Elimination,
    /// The turn limit was reached first.
    TurnLimit,
    /// No limit was set and neither acting unit could deal damage.
    Stalemate,
}

/// Resolver state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleState {
    /// Both sides can still fight.
    InProgress,
    /// The battle is over.
    Concluded(ConclusionReason),
}

/// One recorded attack.
///
/// Attacker and defender are full snapshots; the defender snapshot is taken
/// after the damage was applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleTurn {
    /// 1-based turn number.
    pub turn_number: u32,
    /// Side that attacked.
    pub attacking_side: Side,
    /// Identifier of the attacking player.
    pub attacking_player_id: String,
    /// The attacking unit.
    pub attacker: Unit,
    /// Where the attacker stands.
    pub attacker_position: BoardPosition,
    /// The defending unit after the hit.
    pub defender: Unit,
    /// Where the defender stands.
    pub defender_position: BoardPosition,
    /// Damage dealt.
    pub damage: u32,
    /// Defender hp immediately after the hit.
    pub defender_hp_after: u32,
}

/// Outcome of a resolved battle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleResult<C> {
    /// Every attack in order.
    pub turns: Vec<BattleTurn>,
    /// Final state of the winning side.
    pub winner: C,
    /// Final state of the losing side.
    pub loser: C,
    /// Which side won.
    pub winning_side: Side,
    /// Why the battle ended.
    pub reason: ConclusionReason,
}

impl<C> BattleResult<C> {
    /// Number of recorded turns.
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Final state of one side.
    #[must_use]
    pub fn side(&self, side: Side) -> &C {
        if side == self.winning_side {
            &self.winner
        } else {
            &self.loser
        }
    }
}

impl<C: Hash> BattleResult<C> {
    /// Deterministic hash of the whole result, for replay verification.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Something that can fight on one side of a battle.
///
/// Implemented by [`Player`] (a full board) and by [`Unit`] (a bare unit
/// acting as a one-slot board at front-0), so both battle shapes share one
/// turn loop.
pub trait Combatant: Clone {
    /// Identifier recorded as the attacking side's id.
    fn combatant_id(&self) -> &str;

    /// The unit that acts this turn.
    fn select_attacker(&self) -> Option<(BoardPosition, &Unit)>;

    /// The position this side is hit at.
    fn select_target(&self) -> Option<BoardPosition>;

    /// Unit standing at `position`.
    fn unit_at(&self, position: BoardPosition) -> Option<&Unit>;

    /// Copy of this side with the occupant of `position` replaced by a newer
    /// snapshot of the same unit.
    #[must_use]
    fn with_unit_at(&self, position: BoardPosition, unit: Unit) -> Self;

    /// Whether this side has no living unit.
    fn has_lost(&self) -> bool;

    /// Sum of remaining hp.
    fn remaining_hp(&self) -> u64;
}

impl Combatant for Player {
    fn combatant_id(&self) -> &str {
        &self.id
    }

    fn select_attacker(&self) -> Option<(BoardPosition, &Unit)> {
        targeting::select_attacker(&self.board)
    }

    fn select_target(&self) -> Option<BoardPosition> {
        targeting::select_target(&self.board)
    }

    fn unit_at(&self, position: BoardPosition) -> Option<&Unit> {
        self.board.unit_at(position)
    }

    fn with_unit_at(&self, position: BoardPosition, unit: Unit) -> Self {
        self.with_board(self.board.replaced(position, Some(unit)))
    }

    fn has_lost(&self) -> bool {
        Player::has_lost(self)
    }

    fn remaining_hp(&self) -> u64 {
        self.board.total_hp()
    }
}

/// Slot a bare unit occupies in a duel.
const DUEL_POSITION: BoardPosition = BoardPosition::ALL[0];

impl Combatant for Unit {
    fn combatant_id(&self) -> &str {
        self.id()
    }

    fn select_attacker(&self) -> Option<(BoardPosition, &Unit)> {
        self.is_alive().then_some((DUEL_POSITION, self))
    }

    fn select_target(&self) -> Option<BoardPosition> {
        self.is_alive().then_some(DUEL_POSITION)
    }

    fn unit_at(&self, position: BoardPosition) -> Option<&Unit> {
        (position == DUEL_POSITION).then_some(self)
    }

    fn with_unit_at(&self, _position: BoardPosition, unit: Unit) -> Self {
        unit
    }

    fn has_lost(&self) -> bool {
        !self.is_alive()
    }

    fn remaining_hp(&self) -> u64 {
        u64::from(self.hp())
    }
}

/// A battle in progress.
///
/// Owns private copies of both sides. [`Battle::step`] plays one attack;
/// [`Battle::run`] plays to the end.
#[derive(Debug, Clone)]
pub struct Battle<C> {
    sides: [C; 2],
    attacker: Side,
    turn_number: u32,
    turns: Vec<BattleTurn>,
    state: BattleState,
    config: BattleConfig,
}

impl<C: Combatant> Battle<C> {
    /// Start a battle with default settings.
    #[must_use]
    pub fn new(side_a: &C, side_b: &C) -> Self {
        Self::with_config(side_a, side_b, BattleConfig::default())
    }

    /// Start a battle with explicit settings.
    #[must_use]
    pub fn with_config(side_a: &C, side_b: &C, config: BattleConfig) -> Self {
        Self {
            sides: [side_a.clone(), side_b.clone()],
            attacker: Side::A,
            turn_number: 1,
            turns: Vec::new(),
            state: BattleState::InProgress,
            config,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    /// Turns recorded so far.
    #[must_use]
    pub fn turns(&self) -> &[BattleTurn] {
        &self.turns
    }

    /// Current state of one side.
    #[must_use]
    pub fn side(&self, side: Side) -> &C {
        &self.sides[side.index()]
    }

    /// Side that attacks next.
    #[must_use]
    pub const fn next_attacker(&self) -> Side {
        self.attacker
    }

    /// Play one attack.
    ///
    /// Returns the recorded turn, or `None` once the battle has concluded.
    pub fn step(&mut self) -> Option<&BattleTurn> {
        if self.state != BattleState::InProgress {
            return None;
        }
        if self.sides.iter().any(Combatant::has_lost) {
            self.conclude(ConclusionReason::Elimination);
            return None;
        }
        if self.turns.len() >= self.turn_limit() {
            self.conclude(ConclusionReason::TurnLimit);
            return None;
        }
        if self.config.max_turns == 0 && self.is_stalled() {
            self.conclude(ConclusionReason::Stalemate);
            return None;
        }

        let attacking_side = self.attacker;
        let defending_side = attacking_side.opponent();

        let Some((turn, defender_after)) = self.resolve_attack(attacking_side) else {
            self.conclude(ConclusionReason::Elimination);
            return None;
        };

        let defending = &self.sides[defending_side.index()];
        self.sides[defending_side.index()] =
            defending.with_unit_at(turn.defender_position, defender_after);

        trace!(
            turn = turn.turn_number,
            side = ?turn.attacking_side,
            attacker = turn.attacker.id(),
            defender = turn.defender.id(),
            position = %turn.defender_position,
            damage = turn.damage,
            hp_after = turn.defender_hp_after,
            "Battle turn"
        );

        self.turns.push(turn);
        self.attacker = defending_side;
        self.turn_number = self.turn_number.saturating_add(1);

        if self.sides.iter().any(Combatant::has_lost) {
            self.conclude(ConclusionReason::Elimination);
        }

        self.turns.last()
    }

    fn turn_limit(&self) -> usize {
        match self.config.max_turns {
            0 => u32::MAX as usize,
            limit => limit as usize,
        }
    }

    /// Both acting units deal no damage, so nothing can change any more.
    fn is_stalled(&self) -> bool {
        self.sides.iter().all(|side| {
            side.select_attacker()
                .map_or(true, |(_, unit)| unit.attack() == 0)
        })
    }

    /// Select attacker and defender and compute the hit without touching
    /// the sides. `None` if either selection comes up empty.
    fn resolve_attack(&self, attacking_side: Side) -> Option<(BattleTurn, Unit)> {
        let attacking = &self.sides[attacking_side.index()];
        let defending = &self.sides[attacking_side.opponent().index()];

        let (attacker_position, attacker) = attacking.select_attacker()?;
        let defender_position = defending.select_target()?;
        let defender = defending.unit_at(defender_position)?;

        let damage = attacker.attack();
        let damaged = defender.take_damage(damage);

        let turn = BattleTurn {
            turn_number: self.turn_number,
            attacking_side,
            attacking_player_id: attacking.combatant_id().to_string(),
            attacker: attacker.clone(),
            attacker_position,
            defender: damaged.clone(),
            defender_position,
            damage,
            defender_hp_after: damaged.hp(),
        };
        Some((turn, damaged))
    }

    fn conclude(&mut self, reason: ConclusionReason) {
        self.state = BattleState::Concluded(reason);
        debug!(
            reason = ?reason,
            turns = self.turns.len(),
            "Battle concluded"
        );
    }

    /// Play the battle to its end and return the result.
    #[must_use]
    pub fn run(mut self) -> BattleResult<C> {
        loop {
            if let BattleState::Concluded(reason) = self.state {
                return self.into_result(reason);
            }
            self.step();
        }
    }

    fn winning_side(&self, reason: ConclusionReason) -> Side {
        let first = self.config.tie_break;
        match reason {
            ConclusionReason::Elimination => {
                if self.side(first).has_lost() {
                    first.opponent()
                } else {
                    first
                }
            }
            ConclusionReason::TurnLimit | ConclusionReason::Stalemate => {
                let first_hp = self.side(first).remaining_hp();
                let second_hp = self.side(first.opponent()).remaining_hp();
                if second_hp > first_hp {
                    first.opponent()
                } else {
                    first
                }
            }
        }
    }

    fn into_result(self, reason: ConclusionReason) -> BattleResult<C> {
        let winning_side = self.winning_side(reason);
        let [side_a, side_b] = self.sides;
        let (winner, loser) = match winning_side {
            Side::A => (side_a, side_b),
            Side::B => (side_b, side_a),
        };

        BattleResult {
            turns: self.turns,
            winner,
            loser,
            winning_side,
            reason,
        }
    }
}

/// Resolve a battle between two players with default settings.
#[must_use]
pub fn evaluate(side_a: &Player, side_b: &Player) -> BattleResult<Player> {
    evaluate_with(side_a, side_b, BattleConfig::default())
}

/// Resolve a battle between any two combatants.
#[must_use]
pub fn evaluate_with<C: Combatant>(side_a: &C, side_b: &C, config: BattleConfig) -> BattleResult<C> {
    Battle::with_config(side_a, side_b, config).run()
}

/// Resolve a duel between two bare units.
#[must_use]
pub fn evaluate_duel(side_a: &Unit, side_b: &Unit) -> BattleResult<Unit> {
    evaluate_with(side_a, side_b, BattleConfig::default())
}
