//! Level data: metadata plus the tap events derived from music analysis
//!
//! Analysis is immutable once loaded. Timestamps are sanitized on the way in
//! so the scheduler can rely on them being finite, non-negative and sorted.

use serde::{Deserialize, Serialize};

/// A moment at which a target should be reachable by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapEvent {
    /// Seconds from the start of the track
    pub time: f32,
    /// Detector confidence (informational)
    #[serde(default)]
    pub confidence: f32,
}

impl TapEvent {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            confidence: 1.0,
        }
    }
}

/// Per-level music analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelAnalysis {
    /// Estimated tempo (beats per minute)
    #[serde(default)]
    pub tempo: f32,
    #[serde(default, rename = "tap_targets")]
    tap_events: Vec<TapEvent>,
}

impl LevelAnalysis {
    /// Build an analysis from raw timestamps
    pub fn new(timestamps: impl IntoIterator<Item = f32>) -> Self {
        Self::from_events(timestamps.into_iter().map(TapEvent::new).collect())
    }

    /// Build an analysis from tap events, dropping unusable timestamps
    pub fn from_events(events: Vec<TapEvent>) -> Self {
        let mut analysis = Self {
            tempo: 0.0,
            tap_events: events,
        };
        analysis.sanitize();
        analysis
    }

    /// Parse the analysis file format; malformed input yields `None`
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<LevelAnalysis>(json) {
            Ok(mut analysis) => {
                analysis.sanitize();
                log::info!("Loaded analysis with {} tap events", analysis.len());
                Some(analysis)
            }
            Err(err) => {
                log::warn!("Malformed level analysis: {err}");
                None
            }
        }
    }

    fn sanitize(&mut self) {
        let before = self.tap_events.len();
        self.tap_events.retain(|e| e.time.is_finite() && e.time >= 0.0);
        if self.tap_events.len() != before {
            log::warn!(
                "Dropped {} invalid tap timestamps",
                before - self.tap_events.len()
            );
        }
        // Stable, so equal timestamps keep their authored order
        self.tap_events.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Tap events in non-decreasing time order
    pub fn tap_events(&self) -> &[TapEvent] {
        &self.tap_events
    }

    pub fn len(&self) -> usize {
        self.tap_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tap_events.is_empty()
    }

    /// Timestamp of the last tap event, if any
    pub fn last_time(&self) -> Option<f32> {
        self.tap_events.last().map(|e| e.time)
    }
}

/// Descriptive level data shown by menus and used for score submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMeta {
    pub id: String,
    pub name: String,
    pub difficulty: String,
    /// Music track reference handed to the playback collaborator
    pub track: String,
}

/// A playable level
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub meta: LevelMeta,
    /// Missing analysis means the level spawns nothing
    pub analysis: Option<LevelAnalysis>,
}

impl Level {
    pub fn new(meta: LevelMeta, analysis: Option<LevelAnalysis>) -> Self {
        Self { meta, analysis }
    }
}
