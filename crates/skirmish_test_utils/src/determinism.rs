//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the resolver produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Battle logs are replayed by presenters and checked against saved
//! records, so resolution must be 100% deterministic. Sources of
//! non-determinism to guard against:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Boards are fixed arrays and the catalog is a `BTreeMap`.
//!
//! - **System randomness**: the resolver has none; damage is exactly the
//!   attacker's attack value.
//!
//! - **Shared mutable state**: each battle works on private copies of its
//!   inputs, so concurrent battles cannot interfere.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: targeting and turn-loop rules in isolation
//! 2. **Property tests**: random rosters must still produce deterministic outputs
//! 3. **Integration tests**: preset matchups are reproducible
//! 4. **Parallel tests**: running N battles in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use skirmish_core::prelude::*;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic resolver).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle resolution is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stateful process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
///
/// # Example
///
/// ```
/// use skirmish_core::prelude::*;
/// use skirmish_test_utils::determinism::{compute_hash, verify_determinism};
///
/// let warrior = Unit::with_hp("warrior", 3, 3, 2).unwrap();
/// let knight = Unit::with_hp("knight", 4, 4, 1).unwrap();
///
/// let result = verify_determinism(
///     5,
///     3,
///     || Battle::new(&warrior, &knight),
///     |battle| {
///         battle.step();
///     },
///     |battle| compute_hash(&battle.turns()),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Resolve the same battle `runs` times and compare result hashes.
pub fn verify_battle_determinism(
    player_a: &Player,
    player_b: &Player,
    runs: usize,
) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| evaluate(player_a, player_b).state_hash())
        .collect();
    let steps = evaluate(player_a, player_b).turn_count() as u64;

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        steps,
    }
}

/// Result of parallel battle runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Result hash from each battle.
    pub hashes: Vec<u64>,
    /// Number of battles run.
    pub num_runs: usize,
}

impl ParallelRunResult {
    /// Check if all battles produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all battles matched.
    ///
    /// # Panics
    ///
    /// Panics if battles produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel battles diverged!\n\
                 Battles: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_runs,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Resolve the same battle on `num_runs` scoped threads, all reading the
/// same input rosters.
pub fn run_parallel_battles(
    player_a: &Player,
    player_b: &Player,
    num_runs: usize,
) -> ParallelRunResult {
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| s.spawn(|| evaluate(player_a, player_b).state_hash()))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("battle thread panicked"))
            .collect()
    });

    ParallelRunResult { hashes, num_runs }
}

/// Step two battles side by side and find the first turn at which they
/// differ.
///
/// Returns `None` if both battles play out identically, `Some(turn)` with
/// the 1-based turn number otherwise.
pub fn find_first_divergence<C, F>(setup_fn: F) -> Option<usize>
where
    C: Combatant + Hash,
    F: Fn() -> Battle<C>,
{
    let mut first = setup_fn();
    let mut second = setup_fn();
    let mut turn = 0;

    loop {
        turn += 1;
        let a = first.step().cloned();
        let b = second.step().cloned();
        if a != b {
            return Some(turn);
        }
        let sides_a = (first.side(Side::A), first.side(Side::B));
        let sides_b = (second.side(Side::A), second.side(Side::B));
        if compute_hash(&sides_a) != compute_hash(&sides_b) {
            return Some(turn);
        }
        if a.is_none() {
            return None;
        }
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for battle testing.
///
/// These strategies generate random but reproducible units, boards and
/// players for property-based testing of the resolver.
pub mod strategies {
    use proptest::prelude::*;
    use skirmish_core::prelude::*;

    /// Generate maximum hp values (1-20).
    pub fn arb_max_hp() -> impl Strategy<Value = u32> {
        1u32..20u32
    }

    /// Generate attack values (0-5). Zero-attack units are included on
    /// purpose; they exercise the turn limit.
    pub fn arb_attack() -> impl Strategy<Value = u32> {
        0u32..6u32
    }

    /// Generate `(hp, max_hp, attack)` with `hp <= max_hp`. Current hp may
    /// be zero, producing units that start out defeated.
    pub fn arb_unit_stats() -> impl Strategy<Value = (u32, u32, u32)> {
        (arb_max_hp(), arb_attack())
            .prop_flat_map(|(max_hp, attack)| (0..=max_hp, Just(max_hp), Just(attack)))
    }

    /// Generate a unit with the given id.
    pub fn arb_unit(id: impl Into<String>) -> impl Strategy<Value = Unit> {
        let id: String = id.into();
        (arb_unit_stats(), -100i32..100, -100i32..100).prop_map(move |((hp, max_hp, attack), x, y)| {
            Unit::with_hp(id.clone(), hp, max_hp, attack)
                .expect("strategy keeps hp within max_hp")
                .at(x, y)
        })
    }

    /// Generate any valid board position.
    pub fn arb_position() -> impl Strategy<Value = BoardPosition> {
        (0usize..BoardPosition::ALL.len()).prop_map(|i| BoardPosition::ALL[i])
    }

    /// Generate a board with each slot independently empty or occupied.
    ///
    /// Unit ids are `{prefix}-{index}` so boards built with different
    /// prefixes never share ids.
    pub fn arb_board(prefix: impl Into<String>) -> impl Strategy<Value = Board> {
        let prefix: String = prefix.into();
        proptest::array::uniform5(proptest::option::of(arb_unit_stats())).prop_map(move |slots| {
            slots
                .into_iter()
                .zip(BoardPosition::ALL)
                .enumerate()
                .fold(Board::new(), |board, (i, (slot, position))| match slot {
                    Some((hp, max_hp, attack)) => {
                        let unit = Unit::with_hp(format!("{prefix}-{i}"), hp, max_hp, attack)
                            .expect("strategy keeps hp within max_hp");
                        board
                            .place_unit(unit, position)
                            .expect("ids are unique per slot")
                    }
                    None => board,
                })
        })
    }

    /// Generate a player with a random board.
    pub fn arb_player(id: impl Into<String>) -> impl Strategy<Value = Player> {
        let id: String = id.into();
        arb_board(id.clone()).prop_map(move |board| Player::new(id.clone(), id.clone(), board))
    }

    /// Generate two opposing players with disjoint unit ids.
    pub fn arb_matchup() -> impl Strategy<Value = (Player, Player)> {
        (arb_player("a"), arb_player("b"))
    }
}
