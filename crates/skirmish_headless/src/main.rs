//! Headless battle runner.
//!
//! Resolves battles between two rosters and prints the results. Reports go
//! to stdout, logs and status lines to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Resolve two built-in compositions (default: simple_warrior vs simple_knight)
//! cargo run -p skirmish_headless -- run --a mixed --b balanced --format json
//!
//! # Watch a battle turn by turn
//! cargo run -p skirmish_headless -- play --scenario scenarios/duel.ron --pause-ms 250
//!
//! # Matchup table of every built-in composition
//! cargo run -p skirmish_headless -- matrix --parallel 4
//!
//! # Verify determinism
//! cargo run -p skirmish_headless -- verify --a mixed --b mixed --runs 10
//!
//! # Verify a saved record
//! cargo run -p skirmish_headless -- replay --file duel.bin --verify
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skirmish_core::battle::evaluate_with;
use skirmish_core::data::{compositions, UnitCatalog};
use skirmish_core::replay::{BattleRecord, TurnPlayer};
use skirmish_core::roster::Player;
use skirmish_headless::{
    ascii_board::{play, AsciiConfig},
    batch::{run_matrix, verify_determinism, MatrixConfig},
    report::{summary_line, BattleReport, OutputFormat},
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "skirmish_headless")]
#[command(about = "Headless battle runner for balance testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the two rosters come from.
#[derive(Args, Clone)]
struct BattleSource {
    /// Scenario file to load (overrides --a/--b)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Built-in composition for side A
    #[arg(long, default_value = compositions::SIMPLE_WARRIOR)]
    a: String,

    /// Built-in composition for side B
    #[arg(long, default_value = compositions::SIMPLE_KNIGHT)]
    b: String,

    /// Override the turn limit (0 = unlimited)
    #[arg(long)]
    max_turns: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single battle and print the report
    Run {
        #[command(flatten)]
        source: BattleSource,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Save a battle record to this path
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Play a battle turn by turn on an ASCII board
    Play {
        #[command(flatten)]
        source: BattleSource,

        /// Pause between turns in milliseconds
        #[arg(long, default_value = "1000")]
        pause_ms: u64,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Play every built-in composition against every other
    Matrix {
        /// Maximum parallel battles (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Unit catalog file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Override the turn limit (0 = unlimited)
        #[arg(long)]
        max_turns: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Verify determinism by resolving the same battle multiple times
    Verify {
        #[command(flatten)]
        source: BattleSource,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Replay a saved battle record
    Replay {
        /// Record file path
        #[arg(short, long)]
        file: PathBuf,

        /// Verify the record produces an identical hash
        #[arg(long)]
        verify: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for reports)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Some(Commands::Run {
            source,
            format,
            record,
        }) => {
            cmd_run(&source, format, record);
        }
        Some(Commands::Play {
            source,
            pause_ms,
            no_color,
        }) => {
            cmd_play(&source, pause_ms, no_color);
        }
        Some(Commands::Matrix {
            parallel,
            catalog,
            max_turns,
            format,
        }) => {
            cmd_matrix(parallel, catalog, max_turns, format);
        }
        Some(Commands::Verify { source, runs }) => {
            cmd_verify(&source, runs);
        }
        Some(Commands::Replay { file, verify }) => {
            cmd_replay(file, verify);
        }
        None => {
            // Default: the simple duel as a text report
            let source = BattleSource {
                scenario: None,
                a: compositions::SIMPLE_WARRIOR.to_string(),
                b: compositions::SIMPLE_KNIGHT.to_string(),
                max_turns: None,
            };
            cmd_run(&source, OutputFormat::Text, None);
        }
    }
}

/// Load the scenario and build both players, exiting on failure.
fn load_battle(source: &BattleSource) -> (Scenario, Player, Player) {
    let scenario = match &source.scenario {
        Some(path) => {
            tracing::info!("Loading scenario: {}", path.display());
            Scenario::load(path)
        }
        None => Scenario::from_presets(&source.a, &source.b),
    };
    let mut scenario = match scenario {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(max_turns) = source.max_turns {
        scenario.config.max_turns = max_turns;
    }

    match scenario.build_players() {
        Ok((a, b)) => (scenario, a, b),
        Err(e) => {
            eprintln!("Failed to build rosters: {}", e);
            std::process::exit(1);
        }
    }
}

/// Resolve a single battle
fn cmd_run(source: &BattleSource, format: OutputFormat, record: Option<PathBuf>) {
    let (scenario, a, b) = load_battle(source);
    tracing::info!(
        scenario = %scenario.name,
        max_turns = scenario.config.max_turns,
        "Resolving battle"
    );

    let (battle_record, result) = BattleRecord::capture(&a, &b, scenario.config);

    match BattleReport::new(&scenario.name, &a, &b, &result).render(format) {
        Ok(report) => print!("{}", report),
        Err(e) => {
            eprintln!("Failed to render report: {}", e);
            std::process::exit(1);
        }
    }
    if format != OutputFormat::Text {
        println!();
    }

    if let Some(path) = record {
        if let Err(e) = battle_record.save(&path) {
            eprintln!("Failed to save record: {}", e);
            std::process::exit(1);
        }
        eprintln!("Record saved to: {}", path.display());
    }
}

/// Play a battle on the ASCII board
fn cmd_play(source: &BattleSource, pause_ms: u64, no_color: bool) {
    let (scenario, a, b) = load_battle(source);
    tracing::info!("Playing: {}", scenario.name);

    let result = evaluate_with(&a, &b, scenario.config);
    let mut player = TurnPlayer::for_battle(&a, &b, &result);
    let config = AsciiConfig {
        use_color: !no_color,
        ..AsciiConfig::default()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = play(
        &mut player,
        (a.id.as_str(), b.id.as_str()),
        Duration::from_millis(pause_ms),
        &config,
        &mut out,
    ) {
        eprintln!("Playback failed: {}", e);
        std::process::exit(1);
    }
    println!("{}", summary_line(&result));
}

/// Run the matchup matrix
fn cmd_matrix(
    parallel: u32,
    catalog: Option<PathBuf>,
    max_turns: Option<u32>,
    format: OutputFormat,
) {
    let catalog = match catalog {
        Some(path) => match UnitCatalog::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load catalog: {}", e);
                std::process::exit(1);
            }
        },
        None => UnitCatalog::default(),
    };

    let mut config = MatrixConfig {
        parallel_battles: parallel,
        ..MatrixConfig::default()
    };
    if let Some(max_turns) = max_turns {
        config.battle.max_turns = max_turns;
    }

    let matrix = match run_matrix(&config, &catalog) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Matrix failed: {}", e);
            std::process::exit(1);
        }
    };

    let output = match format {
        OutputFormat::Text => Ok(matrix.to_table()),
        OutputFormat::Json => serde_json::to_string_pretty(&matrix).map_err(|e| e.to_string()),
        OutputFormat::Ron => ron::ser::to_string_pretty(&matrix, ron::ser::PrettyConfig::default())
            .map_err(|e| e.to_string()),
    };
    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to render matrix: {}", e);
            std::process::exit(1);
        }
    }

    eprintln!(
        "{} battles in {:.3}s",
        matrix.cells.len(),
        matrix.duration_seconds
    );
}

/// Verify determinism
fn cmd_verify(source: &BattleSource, runs: u32) {
    let (scenario, a, b) = load_battle(source);
    tracing::info!(
        "Verifying determinism: {} ({} runs)",
        scenario.name,
        runs
    );

    let outcome = verify_determinism(&a, &b, scenario.config, runs);

    if outcome.deterministic {
        eprintln!("PASS: All {} runs produced identical results", runs);
        if let Some(hash) = outcome.hashes.first() {
            eprintln!("  Hash: {:016x}", hash);
        }
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        for (i, hash) in outcome.hashes.iter().enumerate() {
            eprintln!("  Run {}: {:016x}", i, hash);
        }
        std::process::exit(1);
    }
}

/// Replay a saved record
fn cmd_replay(file: PathBuf, verify: bool) {
    if verify {
        tracing::info!("Verifying record: {}", file.display());
    } else {
        tracing::info!("Replaying record: {}", file.display());
    }

    let record = match BattleRecord::load(&file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load record: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Loaded record:");
    eprintln!("  Side A: {} ({})", record.player_a.name, record.player_a.id);
    eprintln!("  Side B: {} ({})", record.player_b.name, record.player_b.id);
    eprintln!("  Turns: {}", record.turn_count);
    eprintln!("  Winner: {:?}", record.winning_side);

    if verify {
        let actual = record.resolve().state_hash();
        if actual == record.result_hash {
            eprintln!("PASS: Record verification successful");
            eprintln!("  Expected hash: {:016x}", record.result_hash);
            eprintln!("  Actual hash:   {:016x}", actual);
        } else {
            eprintln!("FAIL: Record produced different hash!");
            eprintln!("  Expected: {:016x}", record.result_hash);
            eprintln!("  Actual:   {:016x}", actual);
            std::process::exit(1);
        }
    } else {
        let result = record.resolve();
        let name = format!("{} vs {}", record.player_a.name, record.player_b.name);
        print!(
            "{}",
            BattleReport::new(&name, &record.player_a, &record.player_b, &result).to_text()
        );
    }
}
