//! Audio collaborator interface
//!
//! Decoding and playback happen outside the core. The session only needs to
//! ask whether the level track is still playing and to pause/resume/stop it.
//! Sound effects are surfaced as cues for the playback layer to voice.

use rand::Rng;

/// A playing music track
pub trait AudioTrack {
    fn is_playing(&self) -> bool;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);

    /// Called once per unpaused frame. Real transports advance on their own
    /// and ignore this; frame-clocked tracks use it as their position source.
    fn advance(&mut self, _dt: f32) {}
}

/// Playback state of a [`ClockTrack`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Playing,
    Paused,
    Stopped,
}

/// A track of fixed duration whose position is driven by the frame clock.
///
/// Stands in for real playback in headless runs and tests.
#[derive(Debug, Clone)]
pub struct ClockTrack {
    duration: f32,
    position: f32,
    state: TrackState,
}

impl ClockTrack {
    /// Start playing a track of `duration` seconds
    pub fn play(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            position: 0.0,
            state: if duration > 0.0 {
                TrackState::Playing
            } else {
                TrackState::Stopped
            },
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn state(&self) -> TrackState {
        self.state
    }
}

impl AudioTrack for ClockTrack {
    fn is_playing(&self) -> bool {
        self.state == TrackState::Playing
    }

    fn pause(&mut self) {
        if self.state == TrackState::Playing {
            self.state = TrackState::Paused;
        }
    }

    fn resume(&mut self) {
        if self.state == TrackState::Paused {
            self.state = TrackState::Playing;
        }
    }

    fn stop(&mut self) {
        self.state = TrackState::Stopped;
    }

    fn advance(&mut self, dt: f32) {
        if self.state != TrackState::Playing {
            return;
        }
        self.position += dt;
        if self.position >= self.duration {
            self.position = self.duration;
            self.state = TrackState::Stopped;
        }
    }
}

/// Sound effect cues raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Every shot
    Gunshot,
    /// Every Nth shot, layered over the gunshot
    Ping,
}

impl SoundCue {
    /// Playback volume (0.0 - 1.0)
    pub fn volume(self) -> f32 {
        match self {
            SoundCue::Gunshot => 0.15,
            SoundCue::Ping => 0.2,
        }
    }

    /// Inclusive pitch range; each play picks a random pitch in it
    pub fn pitch_range(self) -> (f32, f32) {
        match self {
            SoundCue::Gunshot => (0.95, 1.05),
            SoundCue::Ping => (0.98, 1.02),
        }
    }

    /// Draw a pitch for one play of this cue
    pub fn random_pitch<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        let (lo, hi) = self.pitch_range();
        rng.random_range(lo..=hi)
    }
}
