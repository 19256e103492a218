//! Reaim headless runner
//!
//! Plays one level with an autopilot at a fixed frame rate and submits the
//! score to an in-process leaderboard through a simulated network delay.
//!
//! Usage: `reaim [analysis.json] [tuning.json]`

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use reaim::assets::{self, StaticAssets, Visual};
use reaim::audio::ClockTrack;
use reaim::consts::SIM_DT;
use reaim::session::{
    ScoreSubmission, ScoreSubmitter, SessionConfig, SessionExit, SessionInput, SessionPhase,
    SubmissionReply,
};
use reaim::sim::{GameState, SimContext, TickInput};
use reaim::{Level, LevelAnalysis, LevelMeta, LocalScoreBoard, Session, Tuning};

/// Frame time of the presentation loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Cap on simulation steps per frame
const MAX_SUBSTEPS: u32 = 8;
/// Minimum gap between autopilot shots (seconds)
const AUTOPILOT_COOLDOWN: f32 = 0.2;
/// Simulated submission round trip
const SUBMIT_LATENCY: Duration = Duration::from_millis(400);

/// Submits to a shared [`LocalScoreBoard`] from a tokio task after a delay
struct DelayedSubmitter {
    board: Arc<LocalScoreBoard>,
    runtime: tokio::runtime::Handle,
    latency: Duration,
}

impl ScoreSubmitter for DelayedSubmitter {
    fn submit(&self, submission: ScoreSubmission, reply: SubmissionReply) {
        let board = self.board.clone();
        let latency = self.latency;
        log::info!("Submitting {} for {}", submission.score, submission.player_id);
        self.runtime.spawn(async move {
            tokio::time::sleep(latency).await;
            board.submit(submission, reply);
        });
    }
}

/// Aims at the oldest intact target with some hand shake
struct Autopilot {
    rng: Pcg32,
    cooldown: f32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            cooldown: 0.0,
        }
    }

    fn input(&mut self, game: &GameState, dt: f32) -> TickInput {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let Some(target) = game.targets.iter().find(|t| !t.is_destroyed()) else {
            return TickInput::default();
        };
        let half = target.size / 2.0;
        let jitter = Vec2::new(
            self.rng.random_range(-half.x..=half.x),
            self.rng.random_range(-half.y..=half.y),
        ) * 0.6;
        let aim = target.center() + jitter;

        let fire = self.cooldown <= 0.0 && game.aim_on_target();
        if fire {
            self.cooldown = AUTOPILOT_COOLDOWN;
        }
        TickInput {
            aim: Some(aim),
            fire,
        }
    }
}

fn demo_level(analysis: Option<LevelAnalysis>) -> Level {
    let analysis = analysis.unwrap_or_else(|| LevelAnalysis::new((1..=16).map(|i| i as f32 * 0.5)));
    Level::new(
        LevelMeta {
            id: "demo".into(),
            name: "Demo Beat".into(),
            difficulty: "easy".into(),
            track: "demo.ogg".into(),
        },
        Some(analysis),
    )
}

fn read_arg(index: usize) -> Option<String> {
    let path = std::env::args().nth(index)?;
    match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Failed to read {path}: {e}");
            None
        }
    }
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Reaim (headless) starting...");

    let rt = tokio::runtime::Runtime::new()?;

    let analysis = read_arg(1).and_then(|json| LevelAnalysis::from_json(&json));
    let tuning = read_arg(2).map(|json| Tuning::from_json(&json)).unwrap_or_default();

    let level = demo_level(analysis);
    let track_secs = level
        .analysis
        .as_ref()
        .and_then(LevelAnalysis::last_time)
        .unwrap_or(0.0)
        + 1.0;

    let asset_pack = StaticAssets::new()
        .with(assets::TARGET, Visual::new(256.0, 256.0, 1))
        .with(assets::TARGET_DESTRUCTION, Visual::new(256.0, 256.0, 4))
        .with(assets::GUN, Visual::new(512.0, 512.0, 4))
        .with(assets::CASING, Visual::new(64.0, 64.0, 4));
    let ctx = SimContext::from_assets(&asset_pack, tuning, Vec2::new(1280.0, 720.0));

    let board = Arc::new(LocalScoreBoard::new());
    let submitter = DelayedSubmitter {
        board: board.clone(),
        runtime: rt.handle().clone(),
        latency: SUBMIT_LATENCY,
    };

    let seed = 0x5eed;
    let mut session = Session::start(
        SessionConfig {
            player_id: "autopilot".into(),
            level,
            seed,
        },
        ctx,
        Some(ClockTrack::play(track_secs)),
        Box::new(submitter),
    );
    let mut pilot = Autopilot::new(seed ^ 0xa11);
    let mut cue_rng = Pcg32::seed_from_u64(seed);

    let mut accumulator = 0.0;
    while !session.is_done() {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = SessionInput {
                tick: pilot.input(session.game(), SIM_DT),
                ..Default::default()
            };
            session.update(&input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            for event in &session.game().events {
                for cue in event.sound_cues() {
                    log::trace!(
                        "{cue:?} vol {:.2} pitch {:.3}",
                        cue.volume(),
                        cue.random_pitch(&mut cue_rng)
                    );
                }
            }
        }

        // Only the submission round trip needs wall-clock time
        if session.phase() == SessionPhase::Completing {
            std::thread::sleep(Duration::from_secs_f32(FRAME_DT));
        }
    }

    let game = session.game();
    match session.exit() {
        Some(SessionExit::Completed { score, outcome }) => {
            println!("Level complete: {score} points ({outcome:?})");
        }
        Some(SessionExit::Quit { score }) => println!("Quit with {score} points"),
        None => {}
    }
    println!(
        "Shots {} | hits {} | accuracy {:.0}%",
        game.shots_fired,
        game.hits,
        game.accuracy() * 100.0
    );

    let leaderboard = board.leaderboard(&session.config().level.meta.id);
    for (rank, entry) in leaderboard.entries.iter().enumerate() {
        println!("#{:<2} {:<12} {}", rank + 1, entry.player_id, entry.score);
    }

    Ok(())
}
