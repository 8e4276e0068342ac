//! Line-oriented scoring sessions.
//!
//! Everything reads from a `BufRead` and writes to a `Write` so the same
//! code drives a terminal and the integration tests.

use crate::commands::{COMMAND_HELP, MatchCommand, parse_command};
use anyhow::{Context, Result};
use darts_core::{
    game::{Match, PlayerRanking, ScoreEngine, TurnOutcome, get_rankings},
    league::{League, LeagueManager, LeagueStatus, StandingRow},
    tournament::{Tournament, TournamentManager, TournamentStatus},
};
use log::debug;
use std::io::{BufRead, Write};

/// How an interactive match stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Last contested finish, or `end`
    Completed,
    /// `abandon`; nobody is ranked
    Abandoned,
    /// Input ran out with the match still live
    InputClosed,
}

/// Play one match from prompt lines until it is over.
pub fn run_match<R: BufRead, W: Write>(
    engine: &ScoreEngine,
    game: &mut Match,
    input: &mut R,
    out: &mut W,
) -> Result<SessionEnd> {
    render_scoreboard(game, out)?;

    while game.active {
        let Some(player) = game.current_player() else {
            break;
        };
        write!(out, "{} ({})> ", player.name, player.remaining_score)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            writeln!(out)?;
            return Ok(SessionEnd::InputClosed);
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "Error: {e}")?;
                continue;
            }
        };
        debug!("Match {}: command {:?}", game.id, command);

        match command {
            MatchCommand::Throw(values) => match engine.submit_turn(game, &values) {
                Ok(outcome) => render_outcome(&outcome, out)?,
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            MatchCommand::Undo => match engine.undo_last_turn(game) {
                Ok(undo) => writeln!(
                    out,
                    "Undid last turn of {}, back on {}",
                    undo.player_name, undo.new_remaining
                )?,
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            MatchCommand::End => {
                let rankings = engine.end_game(game)?;
                writeln!(out, "Match ended.")?;
                render_rankings(&rankings, out)?;
            }
            MatchCommand::Abandon => {
                engine.abandon_game(game)?;
                writeln!(out, "Match abandoned.")?;
                return Ok(SessionEnd::Abandoned);
            }
            MatchCommand::Show => render_scoreboard(game, out)?,
            MatchCommand::Rankings => render_rankings(&get_rankings(game), out)?,
            MatchCommand::Help => writeln!(out, "{COMMAND_HELP}")?,
        }
    }

    Ok(SessionEnd::Completed)
}

fn render_outcome<W: Write>(outcome: &TurnOutcome, out: &mut W) -> Result<()> {
    match outcome {
        TurnOutcome::Scored {
            player_name,
            remaining,
            next_player_name,
        } => writeln!(out, "{player_name}: {remaining} left. Next: {next_player_name}")?,
        TurnOutcome::Bust {
            player_name,
            remaining,
            next_player_name,
        } => writeln!(
            out,
            "BUST! {player_name} stays on {remaining}. Next: {next_player_name}"
        )?,
        TurnOutcome::Finished {
            player_name,
            finish_rank,
            next_player_name,
        } => writeln!(
            out,
            "{player_name} checked out in position {finish_rank}! Next: {next_player_name}"
        )?,
        TurnOutcome::MatchEnded { rankings } => {
            writeln!(out, "Game over!")?;
            render_rankings(rankings, out)?;
        }
    }
    Ok(())
}

/// Print every player's score line; `*` marks the thrower.
pub fn render_scoreboard<W: Write>(game: &Match, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{} {} ({} in)",
        game.config.starting_score, game.config.win_rule, game.config.scoring_unit
    )?;
    for (idx, player) in game.players.iter().enumerate() {
        let marker = if game.active && idx == game.current_player_index {
            '*'
        } else {
            ' '
        };
        let status = if player.finished { " finished" } else { "" };
        writeln!(
            out,
            "{marker} {:<16} {:>4}  darts {:>3}  avg {:>6.2}{status}",
            player.name,
            player.remaining_score,
            player.stats.darts_thrown,
            player.stats.average()
        )?;
    }
    Ok(())
}

pub fn render_rankings<W: Write>(rankings: &[PlayerRanking], out: &mut W) -> Result<()> {
    for r in rankings {
        writeln!(
            out,
            "{:>2}. {:<16} {:>4} left  avg {:>6.2}",
            r.rank, r.name, r.remaining_score, r.average
        )?;
    }
    Ok(())
}

pub fn render_standings<W: Write>(table: &[StandingRow], out: &mut W) -> Result<()> {
    writeln!(out, "  #  Name              P  W  D  L  Pts  +/-")?;
    for row in table {
        writeln!(
            out,
            "{:>3}  {:<16} {:>2} {:>2} {:>2} {:>2} {:>4} {:>4}",
            row.rank,
            row.name,
            row.played,
            row.wins,
            row.draws,
            row.losses,
            row.points,
            row.leg_diff
        )?;
    }
    Ok(())
}

/// Play ready slots in bracket order until the tournament is decided.
///
/// An abandoned slot match stops the run; the slot stays in progress.
pub fn run_tournament<R: BufRead, W: Write>(
    manager: &TournamentManager,
    tournament: &mut Tournament,
    input: &mut R,
    out: &mut W,
) -> Result<SessionEnd> {
    while tournament.status == TournamentStatus::InProgress {
        let Some(slot) = tournament.ready_slots().next().cloned() else {
            break;
        };
        let mut game = manager.start_match(tournament, &slot.id)?;
        writeln!(
            out,
            "\n== {:?} round {} match {} ==",
            slot.bracket,
            slot.round.unsigned_abs(),
            slot.match_number
        )?;

        match run_match(manager.engine(), &mut game, input, out)? {
            SessionEnd::Completed => {
                manager.record_from_match(tournament, &slot.id, &game)?;
            }
            end => return Ok(end),
        }
    }

    if let Some(winner) = &tournament.winner {
        writeln!(out, "\n{} wins {}!", winner.name, tournament.name)?;
    }
    Ok(SessionEnd::Completed)
}

/// Play every fixture in schedule order, then print the table.
///
/// An abandoned fixture match goes into the table as a draw.
pub fn run_league<R: BufRead, W: Write>(
    manager: &LeagueManager,
    league: &mut League,
    input: &mut R,
    out: &mut W,
) -> Result<SessionEnd> {
    while league.status == LeagueStatus::InProgress {
        let Some(fixture) = league.fixtures.iter().find(|f| !f.is_completed()).cloned() else {
            break;
        };
        let mut game = manager.start_match(league, &fixture.id)?;
        writeln!(
            out,
            "\n== Round {}: {} v {} ==",
            fixture.round, fixture.player1.name, fixture.player2.name
        )?;

        if run_match(manager.engine(), &mut game, input, out)? == SessionEnd::InputClosed {
            return Ok(SessionEnd::InputClosed);
        }
        manager.record_from_match(league, &fixture.id, &game)?;
        render_standings(&manager.get_standings(league), out)?;
    }
    Ok(SessionEnd::Completed)
}
