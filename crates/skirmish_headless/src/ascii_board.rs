//! ASCII board renderer and paced turn-log playback.
//!
//! Boards are drawn facing each other, side B on top with its back row
//! furthest from the middle line:
//!
//! ```text
//!   p2 back : [ knight-2-0  4/4 ] [ knight-2-1  4/4 ]
//!   p2 front: [ warrior-2-0 3/3 ] [       --        ] [ warrior-2-1 3/3 ]
//!   ------------------------------------------------------------------
//!   p1 front: [ knight-1-0  4/4 ] [ knight-1-1  4/4 ] [ knight-1-2  4/4 ]
//!   p1 back : [       --        ] [       --        ]
//! ```

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use skirmish_core::battle::{BattleTurn, Side};
use skirmish_core::board::Board;
use skirmish_core::position::{BoardPosition, Row};
use skirmish_core::replay::TurnPlayer;
use skirmish_core::unit::Unit;

use crate::report::describe_turn;

/// Default pause between turns during playback.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(1000);

/// ASCII rendering configuration.
#[derive(Debug, Clone)]
pub struct AsciiConfig {
    /// Width of each slot's text, excluding brackets.
    pub cell_width: usize,
    /// Show hp next to unit ids.
    pub show_health: bool,
    /// Use colored output (ANSI).
    pub use_color: bool,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            cell_width: 18,
            show_health: true,
            use_color: true,
        }
    }
}

/// ANSI color codes.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
}

fn health_color(unit: &Unit) -> &'static str {
    let percent = f64::from(unit.hp()) / f64::from(unit.max_hp());
    if !unit.is_alive() {
        colors::DIM
    } else if percent > 0.66 {
        colors::GREEN
    } else if percent > 0.33 {
        colors::YELLOW
    } else {
        colors::RED
    }
}

fn render_cell(unit: Option<&Unit>, highlighted: bool, config: &AsciiConfig) -> String {
    let width = config.cell_width;
    let text = match unit {
        None => "--".to_string(),
        Some(unit) if !unit.is_alive() => format!("{} x", unit.id()),
        Some(unit) if config.show_health => {
            format!("{} {}/{}", unit.id(), unit.hp(), unit.max_hp())
        }
        Some(unit) => unit.id().to_string(),
    };
    let text: String = text.chars().take(width).collect();
    let marker = if highlighted { '*' } else { ' ' };
    let cell = format!("[{marker}{text:^width$}{marker}]");

    match unit {
        Some(unit) if config.use_color => {
            let bold = if highlighted { colors::BOLD } else { "" };
            format!("{bold}{}{cell}{}", health_color(unit), colors::RESET)
        }
        _ => cell,
    }
}

fn render_row(
    board: &Board,
    row: Row,
    label: &str,
    highlight: Option<BoardPosition>,
    config: &AsciiConfig,
) -> String {
    let cells: Vec<String> = board
        .slots()
        .filter(|slot| slot.position.row() == row)
        .map(|slot| render_cell(slot.unit, highlight == Some(slot.position), config))
        .collect();
    format!("  {label} {:<5}: {}", row.as_str(), cells.join(" "))
}

/// Render both boards, side B on top.
///
/// The defender of `last_turn`, if any, is marked with `*`.
pub fn render_boards(
    labels: (&str, &str),
    board_a: &Board,
    board_b: &Board,
    last_turn: Option<&BattleTurn>,
    config: &AsciiConfig,
) -> String {
    let highlight = |side: Side| {
        last_turn
            .filter(|turn| turn.attacking_side.opponent() == side)
            .map(|turn| turn.defender_position)
    };
    let hl_a = highlight(Side::A);
    let hl_b = highlight(Side::B);

    let lines = [
        render_row(board_b, Row::Back, labels.1, hl_b, config),
        render_row(board_b, Row::Front, labels.1, hl_b, config),
        format!("  {}", "-".repeat(3 * (config.cell_width + 5) + 12)),
        render_row(board_a, Row::Front, labels.0, hl_a, config),
        render_row(board_a, Row::Back, labels.0, hl_a, config),
    ];
    lines.join("\n")
}

/// Play a turn log to `out`, one frame per turn, sleeping `pause` between
/// frames.
///
/// Stops early if the player is paused.
pub fn play<W: Write>(
    player: &mut TurnPlayer,
    labels: (&str, &str),
    pause: Duration,
    config: &AsciiConfig,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Start")?;
    writeln!(
        out,
        "{}\n",
        render_boards(labels, player.board(Side::A), player.board(Side::B), None, config)
    )?;

    while let Some(turn) = player.advance().cloned() {
        if !pause.is_zero() {
            out.flush()?;
            thread::sleep(pause);
        }
        writeln!(out, "{}", describe_turn(&turn))?;
        writeln!(
            out,
            "{}\n",
            render_boards(
                labels,
                player.board(Side::A),
                player.board(Side::B),
                Some(&turn),
                config
            )
        )?;
        tracing::trace!(
            turn = turn.turn_number,
            progress = player.progress_percent(),
            "Played turn"
        );
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::battle::evaluate;
    use skirmish_test_utils::fixtures::{back, front, preset_player, unit};

    fn plain() -> AsciiConfig {
        AsciiConfig {
            use_color: false,
            ..AsciiConfig::default()
        }
    }

    #[test]
    fn test_render_cell_states() {
        let config = plain();
        let alive = unit("w", 3, 2);
        assert!(render_cell(Some(&alive), false, &config).contains("w 3/3"));
        assert!(render_cell(Some(&alive.take_damage(3)), false, &config).contains("w x"));
        assert!(render_cell(None, false, &config).contains("--"));
        assert!(render_cell(Some(&alive), true, &config).starts_with("[*"));
    }

    #[test]
    fn test_render_boards_layout() {
        let a = preset_player("p1", "mixed", 1);
        let b = preset_player("p2", "balanced", 2);
        let text = render_boards(("p1", "p2"), &a.board, &b.board, None, &plain());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("p2 back"));
        assert!(lines[1].contains("knight-2-0 4/4"));
        assert!(lines[3].contains("warrior-1-0 3/3"));
        assert!(lines[4].contains("knight-1-1 4/4"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_highlight_marks_defender() {
        let a = preset_player("p1", "simple_warrior", 1);
        let b = preset_player("p2", "simple_knight", 2);
        let result = evaluate(&a, &b);
        let text = render_boards(
            ("p1", "p2"),
            &a.board,
            &b.board,
            Some(&result.turns[0]),
            &plain(),
        );
        assert!(text.lines().nth(1).unwrap().contains("[*"));
    }

    #[test]
    fn test_play_writes_every_turn() {
        let a = preset_player("p1", "mixed", 1);
        let b = preset_player("p2", "mixed", 2);
        let result = evaluate(&a, &b);
        let mut player = TurnPlayer::for_battle(&a, &b, &result);

        let mut out = Vec::new();
        play(&mut player, ("p1", "p2"), Duration::ZERO, &plain(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(player.is_finished());
        assert_eq!(
            text.lines().filter(|l| l.starts_with("Turn")).count(),
            result.turns.len()
        );
    }

    #[test]
    fn test_back_row_rendering_of_small_board() {
        let board = skirmish_test_utils::fixtures::board(vec![
            (unit("f", 2, 1), front(2)),
            (unit("b", 2, 1), back(0)),
        ]);
        let row = render_row(&board, Row::Back, "x", None, &plain());
        assert!(row.contains("b 2/2"));
        assert_eq!(row.matches('[').count(), 2);
    }
}
