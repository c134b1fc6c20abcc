//! Gem Rush headless runner
//!
//! Drives the simulation from a fixed-timestep host loop with the autopilot
//! at the controls, logging round events. Completing a stage unlocks and
//! starts the next one.
//!
//! Usage: gem-rush [--seed N] [--seconds S] [--stage one|two|three]
//!                 [--level FILE] [--tuning FILE] [--save FILE]

use std::process::ExitCode;

use gem_rush::consts::*;
use gem_rush::sim::{GemColor, Round, RoundEvent, RoundObserver, RoundPhase, TickInput, tick};
use gem_rush::{LevelConfig, Progress, StageId, Tuning};

/// Host display rate the runner pretends to have
const HOST_DT: f32 = 1.0 / 144.0;

#[derive(Debug)]
struct Options {
    seed: u64,
    seconds: f32,
    stage: StageId,
    level: Option<String>,
    tuning: Option<String>,
    save: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 12345,
            seconds: 120.0,
            stage: StageId::One,
            level: None,
            tuning: None,
            save: None,
        }
    }
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut opts = Options::default();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--seed" => {
                    let v = value()?;
                    opts.seed = v.parse().map_err(|_| format!("Bad seed '{v}'"))?;
                }
                "--seconds" => {
                    let v = value()?;
                    opts.seconds = v.parse().map_err(|_| format!("Bad duration '{v}'"))?;
                }
                "--stage" => {
                    let v = value()?;
                    opts.stage =
                        StageId::from_str(&v).ok_or_else(|| format!("Unknown stage '{v}'"))?;
                }
                "--level" => opts.level = Some(value()?),
                "--tuning" => opts.tuning = Some(value()?),
                "--save" => opts.save = Some(value()?),
                other => return Err(format!("Unknown argument '{other}'")),
            }
        }
        Ok(opts)
    }
}

/// Tallies events and reports them through the log
#[derive(Debug, Default)]
struct EventLog {
    pickups: u32,
    new_colors: u32,
    deaths: u32,
    hazards: u32,
}

impl RoundObserver for EventLog {
    fn on_collect(&mut self, color: GemColor, newly: bool) {
        self.pickups += 1;
        if newly {
            self.new_colors += 1;
            log::info!("Collected {:?}", color);
        } else {
            log::debug!("Collected {:?} again", color);
        }
    }

    fn on_lethal_hit(&mut self) {
        self.deaths += 1;
    }

    fn on_round_complete(&mut self, stage: StageId, unlocks: Option<StageId>) {
        match unlocks {
            Some(next) => log::info!("Stage {} cleared, {} is next", stage, next),
            None => log::info!("Stage {} cleared, that was the last one", stage),
        }
    }

    fn on_hazard_spawned(&mut self, _id: u32, _direction: gem_rush::sim::Direction) {
        self.hazards += 1;
    }
}

/// Host loop state
struct Runner {
    round: Round,
    progress: Progress,
    tuning: Tuning,
    custom_level: bool,
    save_path: Option<String>,
    seed: u64,
    accumulator: f32,
    input: TickInput,
    observer: EventLog,
    last_phase: RoundPhase,
}

impl Runner {
    fn new(opts: &Options) -> Result<Self, String> {
        let tuning = match &opts.tuning {
            Some(path) => Tuning::load(path).map_err(|e| e.to_string())?,
            None => Tuning::default(),
        };
        let progress = match &opts.save {
            Some(path) => Progress::load_or_default(path),
            None => Progress::new(),
        };
        let level = match &opts.level {
            Some(path) => LevelConfig::load(path, &tuning).map_err(|e| e.to_string())?,
            None => LevelConfig::stage(opts.stage),
        };
        let round = Round::activate(&level, &progress, tuning.clone(), opts.seed)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            round,
            progress,
            tuning,
            custom_level: opts.level.is_some(),
            save_path: opts.save.clone(),
            seed: opts.seed,
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            observer: EventLog::default(),
            last_phase: RoundPhase::Active,
        })
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let events = tick(&mut self.round, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in &events {
                event.dispatch(&mut self.observer);
                self.record(event);
            }
        }

        // Log phase transitions
        let phase = self.round.phase;
        if phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
    }

    fn record(&mut self, event: &RoundEvent) {
        if !self.progress.record(event) {
            return;
        }
        if let Some(path) = &self.save_path {
            if let Err(e) = self.progress.save(path) {
                log::warn!("Could not save progress: {}", e);
            }
        }
    }

    /// Start the next stage after a win; false if there is none to play
    fn advance_stage(&mut self) -> bool {
        if self.custom_level {
            return false;
        }
        let Some(next) = self.round.stage.next() else {
            return false;
        };
        self.seed = self.seed.wrapping_add(1);
        match Round::activate(
            &LevelConfig::stage(next),
            &self.progress,
            self.tuning.clone(),
            self.seed,
        ) {
            Ok(round) => {
                self.round = round;
                self.last_phase = RoundPhase::Active;
                true
            }
            Err(e) => {
                log::error!("Could not start stage {}: {}", next, e);
                false
            }
        }
    }

    fn run(&mut self, seconds: f32) {
        let frames = (seconds / HOST_DT).ceil() as u64;
        for _ in 0..frames {
            self.update(HOST_DT);
            if self.round.is_complete() && !self.advance_stage() {
                break;
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match Options::parse(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Gem Rush (headless) starting with seed {}", opts.seed);

    let mut runner = match Runner::new(&opts) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    runner.run(opts.seconds);

    let stats = &runner.observer;
    log::info!(
        "Finished on stage {} ({:?}) at t={:.1}s: {} pickups, {} new colors, {} hazards, {} deaths",
        runner.round.stage,
        runner.round.phase,
        runner.round.elapsed,
        stats.pickups,
        stats.new_colors,
        stats.hazards,
        stats.deaths
    );
    let unlocked: Vec<_> = runner.progress.unlocked_stages().map(|s| s.as_str()).collect();
    log::info!("Unlocked stages: {}", unlocked.join(", "));

    ExitCode::SUCCESS
}
