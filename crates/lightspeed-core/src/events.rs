//! Sound cues emitted by bodies for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::enums::Sound;

/// A sound scheduled at a point in simulation time.
///
/// Cues live on the body that makes them, so a listener hears them with the
/// same light delay as everything else about that body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub time: f64,
    pub sound: Sound,
}

/// Time-sorted cue list owned by a body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CueList {
    cues: Vec<Cue>,
}

impl CueList {
    pub fn push(&mut self, sound: Sound, time: f64) {
        let idx = self.cues.partition_point(|c| c.time <= time);
        self.cues.insert(idx, Cue { time, sound });
    }

    /// Forget every cue scheduled strictly after `time`.
    pub fn clear_after(&mut self, time: f64) {
        let keep = self.cues.partition_point(|c| c.time <= time);
        self.cues.truncate(keep);
    }

    /// Cues in the half-open window `(from, to]`.
    pub fn between(&self, from: f64, to: f64) -> &[Cue] {
        let start = self.cues.partition_point(|c| c.time <= from);
        let end = self.cues.partition_point(|c| c.time <= to);
        &self.cues[start..end.max(start)]
    }

    pub fn all(&self) -> &[Cue] {
        &self.cues
    }
}
