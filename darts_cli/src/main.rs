//! Terminal scorer for darts matches, knockout brackets and leagues.
//!
//! Matches are scored line by line on stdin. Brackets and leagues either
//! play every spawned match the same way or, with `--json`, print the
//! generated structure and exit.

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::{Context, Error};
use darts_cli::{
    config::{CliConfig, Overrides},
    session::{self, SessionEnd},
};
use darts_core::{
    game::ScoreEngine,
    league::{Fixture, LeagueManager},
    tournament::{TournamentFormat, TournamentManager},
};
use log::{info, warn};
use pico_args::Arguments;
use serde::Serialize;

const HELP: &str = "\
Score darts matches, brackets and leagues

USAGE:
  darts_cli <COMMAND> [OPTIONS]

COMMANDS:
  match                    Score one match
  bracket                  Run a single or double elimination bracket
  league                   Run a round-robin league

OPTIONS:
  --players    A,B,C       Comma-separated roster  [default: env DARTS_PLAYERS]
  --start      N           Starting score  [default: env DARTS_STARTING_SCORE or 501]
  --rule       RULE        exact | zero-or-below  [default: exact]
  --unit       UNIT        dart | turn  [default: dart]
  --min-checkout N         Bust below this remainder (exact rule only)  [default: 0]
  --seed       N           Seed seating and bracket draw
  --name       NAME        Tournament or league name
  --format     FORMAT      single | double  [bracket, default: single]
  --slots      N           Bracket size, a power of two  [bracket, default: fits roster]
  --legs       N           Meetings per pairing, 1 or 2  [league, default: 1]

FLAGS:
  --json                   Print the bracket or schedule as JSON and exit
  -h, --help               Print help information

ENVIRONMENT:
  DARTS_PLAYERS            Roster when --players is absent
  DARTS_STARTING_SCORE     Starting score
  DARTS_WIN_RULE           exact | zero-or-below
  DARTS_SCORING_UNIT       dart | turn
  DARTS_MIN_CHECKOUT       Minimum checkout remainder
  DARTS_SEED               Seed for reproducible draws
  LEAGUE_POINTS_WIN        League points for a win  [default: 3]
  LEAGUE_POINTS_DRAW       League points for a draw  [default: 1]
  LEAGUE_POINTS_LOSS       League points for a loss  [default: 0]
  RUST_LOG                 Log filter (e.g., darts_core=debug)
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Match,
    Bracket,
    League,
}

struct Args {
    command: Command,
    overrides: Overrides,
    name: Option<String>,
    format: TournamentFormat,
    slots: Option<usize>,
    legs: u8,
    json: bool,
}

/// Schedule preview printed by `league --json`
#[derive(Serialize)]
struct SchedulePreview<'a> {
    league_id: &'a str,
    name: &'a str,
    rounds: BTreeMap<u32, Vec<&'a Fixture>>,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    env_logger::builder().format_target(false).init();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let command = match pargs.subcommand()?.as_deref() {
        Some("match") => Command::Match,
        Some("bracket") => Command::Bracket,
        Some("league") => Command::League,
        Some(other) => anyhow::bail!("Unknown command '{other}'. Run with --help for usage"),
        None => {
            print!("{HELP}");
            std::process::exit(2);
        }
    };

    let args = Args {
        command,
        overrides: Overrides {
            players: pargs.opt_value_from_str("--players")?,
            starting_score: pargs.opt_value_from_str("--start")?,
            win_rule: pargs.opt_value_from_str("--rule")?,
            scoring_unit: pargs.opt_value_from_str("--unit")?,
            minimum_checkout: pargs.opt_value_from_str("--min-checkout")?,
            seed: pargs.opt_value_from_str("--seed")?,
        },
        name: pargs.opt_value_from_str("--name")?,
        format: pargs
            .opt_value_from_str("--format")?
            .unwrap_or(TournamentFormat::SingleElimination),
        slots: pargs.opt_value_from_str("--slots")?,
        legs: pargs.opt_value_from_str("--legs")?.unwrap_or(1),
        json: pargs.contains("--json"),
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        warn!("Ignoring unused arguments: {:?}", remaining);
    }

    let config = CliConfig::from_env(args.overrides.clone()).context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "Roster of {} ({} {} {})",
        config.players.len(),
        config.match_config.starting_score,
        config.match_config.win_rule,
        config.match_config.scoring_unit
    );

    let engine = ScoreEngine::new(config.services());
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    let end = match args.command {
        Command::Match => {
            let mut game = engine.create_match(&config.players, config.match_config.clone())?;
            session::run_match(&engine, &mut game, &mut input, &mut out)?
        }
        Command::Bracket => {
            let manager = TournamentManager::new(engine);
            let slots = args
                .slots
                .unwrap_or_else(|| config.players.len().max(2).next_power_of_two());
            let mut tournament = manager.create_tournament(
                args.name.as_deref().unwrap_or("Knockout"),
                args.format,
                slots,
                &config.players,
                config.match_config.clone(),
            )?;
            let view = manager.generate_bracket(&mut tournament)?;
            if args.json {
                serde_json::to_writer_pretty(&mut out, &view)?;
                writeln!(out)?;
                return Ok(());
            }
            session::run_tournament(&manager, &mut tournament, &mut input, &mut out)?
        }
        Command::League => {
            let manager = LeagueManager::new(engine);
            let mut league = manager.create_league(
                args.name.as_deref().unwrap_or("League"),
                &config.players,
                args.legs,
                config.points,
                config.match_config.clone(),
            )?;
            manager.generate_fixtures(&mut league)?;
            if args.json {
                let mut rounds: BTreeMap<u32, Vec<&Fixture>> = BTreeMap::new();
                for fixture in &league.fixtures {
                    rounds.entry(fixture.round).or_default().push(fixture);
                }
                let preview = SchedulePreview {
                    league_id: &league.id,
                    name: &league.name,
                    rounds,
                };
                serde_json::to_writer_pretty(&mut out, &preview)?;
                writeln!(out)?;
                return Ok(());
            }
            session::run_league(&manager, &mut league, &mut input, &mut out)?
        }
    };

    if end == SessionEnd::InputClosed {
        warn!("Input closed before the {:?} finished", args.command);
    }
    Ok(())
}
