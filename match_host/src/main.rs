//! Headless runner: AI-only matches or a full AI tournament on a virtual clock.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use game_core::{Config, FrameOutcome, MatchOutcome, Mode, PlayerCount, Variant};
use match_host::logging::init_logging;
use match_host::{
    finish_tournament_match, register_casual_match, submit_outcome, Environment, HostError,
    MatchHost, MatchSetup, Surface,
};
use proto::S2C;
use tournament::{CancellationFlag, MemoryGateway, NextStep, TournamentCoordinator};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run AI-only Pong matches without a display", long_about = None)]
struct Args {
    /// JSON object of config overrides, merged over the mode defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = Run::Tournament)]
    run: Run,
    /// Play the power-up variant
    #[arg(long)]
    power_ups: bool,
    /// Abandon a match after this many simulated minutes
    #[arg(long, default_value_t = 30)]
    max_minutes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Run {
    Two,
    Four,
    Tournament,
}

struct VirtualClock(Rc<Cell<u64>>);

impl Environment for VirtualClock {
    fn now(&self) -> u64 {
        self.0.get()
    }
}

/// Logs match ends instead of drawing
struct LogSurface;

impl Surface for LogSurface {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), HostError> {
        if let S2C::GameOver {
            winner_alias,
            scores,
            ..
        } = S2C::from_bytes(bytes)?
        {
            log::info!("game over: {winner_alias} wins {scores:?}");
        }
        Ok(())
    }
}

struct Runner {
    host: MatchHost,
    clock: Rc<Cell<u64>>,
    args: Args,
}

impl Runner {
    fn config(&self, mode: Mode) -> Result<Config> {
        match &self.args.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Config::from_json(mode, &text).with_context(|| format!("parsing {}", path.display()))
            }
            None => Ok(Config::for_mode(mode)),
        }
    }

    fn play(&mut self, setup: MatchSetup) -> Result<MatchOutcome> {
        let match_id = setup.match_id;
        let tick_ms = setup.config.tick_ms.ceil() as u64;
        self.host.start_match(setup)?;
        let deadline = self.clock.get() + self.args.max_minutes * 60_000;
        while self.clock.get() < deadline {
            self.clock.set(self.clock.get() + tick_ms);
            match self.host.pump() {
                FrameOutcome::Finished(outcome) => return Ok(outcome),
                FrameOutcome::Halted => bail!("match {match_id} halted before finishing"),
                _ => {}
            }
        }
        self.host.teardown();
        bail!("match {match_id} still running after {} minutes", self.args.max_minutes)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let variant = if args.power_ups {
        Variant::PowerUps
    } else {
        Variant::Classic
    };

    let clock = Rc::new(Cell::new(0));
    let mut host = MatchHost::new(Box::new(VirtualClock(clock.clone())));
    host.attach_surface(Box::new(LogSurface));
    let run = args.run;
    let mut runner = Runner { host, clock, args };
    let gateway = Arc::new(MemoryGateway::new());

    match run {
        Run::Two | Run::Four => {
            let (players, names) = if run == Run::Two {
                (PlayerCount::Two, vec!["ai"; 2])
            } else {
                (PlayerCount::Four, vec!["ai"; 4])
            };
            let mode = Mode::new(players, variant);
            let (match_id, seated) = register_casual_match(&gateway, mode, &names).await?;
            let setup = MatchSetup::new(mode, match_id, seated, runner.args.seed)
                .with_config(runner.config(mode)?);
            let outcome = runner.play(setup)?;
            let submitted = submit_outcome(&gateway, &outcome).await;
            log::info!("final score {:?}, stored: {}", outcome.scores, submitted.is_stored());
        }
        Run::Tournament => {
            let mode = Mode::new(PlayerCount::Two, variant);
            let config = runner.config(mode)?;
            let mut coord = TournamentCoordinator::new(gateway.clone(), CancellationFlag::new());
            let mut step = coord.start(&["ai"; 4]).await?;
            loop {
                match step {
                    NextStep::Offer(stage) => {
                        let next = coord.next_match()?;
                        log::info!("playing {stage:?} (match {})", next.match_id);
                        let setup = MatchSetup::new(
                            mode,
                            next.match_id,
                            next.players,
                            runner.args.seed.wrapping_add(next.match_id),
                        )
                        .with_config(config.clone());
                        let outcome = runner.play(setup)?;
                        let (_submitted, next_step) =
                            finish_tournament_match(&gateway, &mut coord, &outcome).await?;
                        step = next_step;
                    }
                    NextStep::Champion(player) => {
                        log::info!("champion: player {} ({})", player.id, player.alias);
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}
