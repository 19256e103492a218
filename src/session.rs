//! Per-attempt session state machine
//!
//! ```text
//! Active <-> Paused
//! Active  -> Completing   (spawning exhausted, track finished, no live targets)
//! Completing -> Done      (submission settled, or watchdog)
//! Active/Paused -> Done   (quit, no submission)
//! ```
//!
//! Score submission is asynchronous. The submitter settles a
//! [`SubmissionReply`] from whatever context it likes; the outcome travels
//! through a channel and is applied on the next `update`. Two one-way flags
//! keep this race-free: the reply accepts only its first settle, and the
//! session makes only one transition to `Done`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::audio::AudioTrack;
use crate::level::Level;
use crate::sim::{GameState, SimContext, Snapshot, TickInput, tick};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Active,
    Paused,
    /// Score submission in flight
    Completing,
    /// Terminal; the caller returns to level select
    Done,
}

/// How a score submission ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionOutcome {
    Accepted,
    Failed(String),
    Cancelled,
}

/// Payload handed to the score submission collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_id: String,
    pub level_id: String,
    pub score: u64,
}

/// Why the session ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionExit {
    Completed { score: u64, outcome: SubmissionOutcome },
    Quit { score: u64 },
}

/// Score submission collaborator
///
/// Must not block. Settle `reply` once the request finishes, from any thread.
pub trait ScoreSubmitter {
    fn submit(&self, submission: ScoreSubmission, reply: SubmissionReply);
}

impl<T: ScoreSubmitter + ?Sized> ScoreSubmitter for Arc<T> {
    fn submit(&self, submission: ScoreSubmission, reply: SubmissionReply) {
        (**self).submit(submission, reply);
    }
}

/// Completion handle for one submission. First settle wins.
#[derive(Debug, Clone)]
pub struct SubmissionReply {
    settled: Arc<AtomicBool>,
    tx: UnboundedSender<SubmissionOutcome>,
}

impl SubmissionReply {
    fn new(tx: UnboundedSender<SubmissionOutcome>) -> Self {
        Self {
            settled: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    /// Deliver the outcome. Returns false if this submission was already settled.
    pub fn settle(&self, outcome: SubmissionOutcome) -> bool {
        if self
            .settled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Ignoring duplicate submission result: {outcome:?}");
            return false;
        }
        if self.tx.send(outcome).is_err() {
            log::debug!("Session gone before submission settled");
        }
        true
    }

    pub fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }
}

/// Input for one session frame
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    /// Gameplay input (ignored unless active)
    pub tick: TickInput,
    pub toggle_pause: bool,
    pub quit: bool,
}

/// Who is playing what
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub player_id: String,
    pub level: Level,
    /// Seed for the first attempt; restarts derive from it
    pub seed: u64,
}

/// One play-through of a level
pub struct Session<A: AudioTrack> {
    config: SessionConfig,
    ctx: SimContext,
    game: GameState,
    audio: Option<A>,
    submitter: Box<dyn ScoreSubmitter>,
    phase: SessionPhase,
    attempt: u32,
    /// One-way: the submission for this attempt was started
    score_submitted: bool,
    /// One-way: the session has made its exit transition
    has_transitioned: AtomicBool,
    outcomes: Option<UnboundedReceiver<SubmissionOutcome>>,
    completing_secs: f32,
    exit: Option<SessionExit>,
}

impl<A: AudioTrack> Session<A> {
    /// Start the first attempt. `audio` is the already playing level track.
    pub fn start(
        config: SessionConfig,
        ctx: SimContext,
        audio: Option<A>,
        submitter: Box<dyn ScoreSubmitter>,
    ) -> Self {
        let game = GameState::new(config.level.analysis.clone(), &ctx, config.seed);
        if config.level.analysis.is_none() {
            log::warn!("Level '{}' has no analysis; nothing will spawn", config.level.meta.id);
        }
        log::info!(
            "Started level '{}' for player {}",
            config.level.meta.name,
            config.player_id
        );
        Self {
            config,
            ctx,
            game,
            audio,
            submitter,
            phase: SessionPhase::Active,
            attempt: 0,
            score_submitted: false,
            has_transitioned: AtomicBool::new(false),
            outcomes: None,
            completing_secs: 0.0,
            exit: None,
        }
    }

    /// Begin a fresh attempt on the same level
    pub fn restart(&mut self, audio: Option<A>) {
        if let Some(old) = self.audio.as_mut() {
            old.stop();
        }
        self.attempt += 1;
        let seed = self.config.seed.wrapping_add(u64::from(self.attempt));
        self.game = GameState::new(self.config.level.analysis.clone(), &self.ctx, seed);
        self.audio = audio;
        self.phase = SessionPhase::Active;
        self.score_submitted = false;
        self.has_transitioned = AtomicBool::new(false);
        self.outcomes = None;
        self.completing_secs = 0.0;
        self.exit = None;
        log::info!(
            "Restarted level '{}' (attempt {})",
            self.config.level.meta.name,
            self.attempt + 1
        );
    }

    /// Advance one frame
    pub fn update(&mut self, input: &SessionInput, dt: f32) {
        // Events describe this frame only; frozen frames raise none
        self.game.events.clear();

        if input.quit {
            self.quit();
        }
        if input.toggle_pause {
            self.toggle_pause();
        }

        self.poll_submission();

        match self.phase {
            SessionPhase::Active => {
                if let Some(audio) = self.audio.as_mut() {
                    audio.advance(dt);
                }
                let playing = self.audio_playing();
                tick(&mut self.game, &self.ctx, &input.tick, playing, dt);
                self.check_completion();
            }
            SessionPhase::Completing => {
                // Let lingering effects play out; no gameplay input
                tick(&mut self.game, &self.ctx, &TickInput::default(), false, dt);
                self.completing_secs += dt;
                if self.completing_secs >= self.ctx.tuning.submission_timeout_secs {
                    log::warn!(
                        "Score submission still pending after {:.1}s, moving on",
                        self.completing_secs
                    );
                    self.finish(SubmissionOutcome::Cancelled);
                }
            }
            SessionPhase::Paused | SessionPhase::Done => {}
        }
    }

    /// Active <-> Paused; ignored in other phases
    pub fn toggle_pause(&mut self) {
        match self.phase {
            SessionPhase::Active => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }
        self.phase = SessionPhase::Paused;
        if let Some(audio) = self.audio.as_mut() {
            audio.pause();
        }
        log::info!("Paused");
    }

    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        self.phase = SessionPhase::Active;
        if let Some(audio) = self.audio.as_mut() {
            audio.resume();
        }
        log::info!("Resumed");
    }

    /// Leave without submitting. Only honoured while active or paused.
    pub fn quit(&mut self) {
        if !matches!(self.phase, SessionPhase::Active | SessionPhase::Paused) {
            return;
        }
        if !self.claim_transition() {
            return;
        }
        log::info!("Quitting level '{}'", self.config.level.meta.name);
        self.stop_audio();
        self.phase = SessionPhase::Done;
        self.exit = Some(SessionExit::Quit {
            score: self.game.score,
        });
    }

    fn audio_playing(&self) -> bool {
        self.audio.as_ref().is_some_and(|a| a.is_playing())
    }

    fn stop_audio(&mut self) {
        if let Some(audio) = self.audio.as_mut() {
            audio.stop();
        }
    }

    fn check_completion(&mut self) {
        if self.score_submitted {
            return;
        }
        let complete = self.game.spawner.is_exhausted()
            && !self.audio_playing()
            && self.game.targets.is_empty();
        if !complete {
            return;
        }

        self.score_submitted = true;
        self.phase = SessionPhase::Completing;
        self.completing_secs = 0.0;
        log::info!("Level complete! Final score: {}", self.game.score);

        let (tx, rx) = mpsc::unbounded_channel();
        self.outcomes = Some(rx);
        self.submitter.submit(
            ScoreSubmission {
                player_id: self.config.player_id.clone(),
                level_id: self.config.level.meta.id.clone(),
                score: self.game.score,
            },
            SubmissionReply::new(tx),
        );

        // Synchronous submitters have already settled
        self.poll_submission();
    }

    /// Apply a settled submission, if one has arrived
    fn poll_submission(&mut self) {
        let Some(rx) = self.outcomes.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Score submitter dropped the request without settling it");
                SubmissionOutcome::Cancelled
            }
        };
        self.outcomes = None;
        self.finish(outcome);
    }

    fn finish(&mut self, outcome: SubmissionOutcome) {
        if !self.claim_transition() {
            log::debug!("Already left the level; ignoring submission result {outcome:?}");
            return;
        }
        match &outcome {
            SubmissionOutcome::Accepted => log::info!("Score submitted: {}", self.game.score),
            SubmissionOutcome::Failed(reason) => log::error!("Failed to submit score: {reason}"),
            SubmissionOutcome::Cancelled => log::warn!("Score submission cancelled"),
        }
        self.stop_audio();
        self.phase = SessionPhase::Done;
        self.exit = Some(SessionExit::Completed {
            score: self.game.score,
            outcome,
        });
    }

    /// First caller wins
    fn claim_transition(&self) -> bool {
        self.has_transitioned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == SessionPhase::Done
    }

    pub fn exit(&self) -> Option<&SessionExit> {
        self.exit.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.game.score
    }

    pub fn score_submitted(&self) -> bool {
        self.score_submitted
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Resize the play area
    pub fn set_screen(&mut self, screen: glam::Vec2) {
        self.ctx.set_screen(screen);
    }

    pub fn audio(&self) -> Option<&A> {
        self.audio.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-model for this frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.game, &self.ctx)
    }
}
