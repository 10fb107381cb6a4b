//! # Score Input Model
//!
//! The per-voice view of a score that the timeline engine consumes. Each
//! voice is bound to one MIDI channel and holds an ordered list of items,
//! each either a rest or a chord, with notated position and duration in
//! milliseconds.
//!
//! ## Type Hierarchy
//! ```text
//! Score
//!   └── Vec<Voice>
//!         ├── channel: u8 (0-15, one voice per channel)
//!         └── Vec<VoiceItem>
//!               ├── position, duration (notated ms)
//!               └── Element (enum)
//!                     ├── Rest
//!                     └── Chord(NotatedChord)
//!                           ├── pitches, velocities
//!                           ├── lyric, bank, patch (passed through)
//!                           └── controllers: ControllerSettings
//! ```
//!
//! ## YAML Form
//! ```yaml
//! voices:
//!   - channel: 0
//!     items:
//!       - position: 0
//!         duration: 400
//!         element: { kind: chord, pitches: [60, 64], velocities: [80, 72] }
//!       - position: 400
//!         duration: 100
//!         element: { kind: rest }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::controller::ControllerSettings;
use crate::error::MomentsError;

/// Highest MIDI channel number
pub const MAX_CHANNEL: u8 = 15;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub channel: u8,
    #[serde(default)]
    pub items: Vec<VoiceItem>,
}

/// One notated event in a voice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceItem {
    pub position: u32,
    pub duration: u32,
    pub element: Element,
}

/// Either a rest or a chord (discriminated union)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Rest,
    Chord(NotatedChord),
}

/// A chord as notated in the score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotatedChord {
    pub pitches: Vec<u8>,
    pub velocities: Vec<u8>,
    #[serde(default)]
    pub lyric: Option<String>,
    #[serde(default)]
    pub bank: Option<u8>,
    #[serde(default)]
    pub patch: Option<u8>,
    #[serde(default)]
    pub controllers: ControllerSettings,
}

impl Score {
    /// Parse a score from a YAML document
    pub fn from_yaml(source: &str) -> Result<Score, MomentsError> {
        let score: Score = serde_yaml::from_str(source)?;
        Ok(score)
    }

    /// Check the voice data the engine relies on.
    ///
    /// - channels are in range and not shared between voices
    /// - item positions never go backwards within a voice
    /// - chords have a non-zero duration, end within `u32` milliseconds and
    ///   carry one velocity per pitch
    pub fn validate(&self) -> Result<(), MomentsError> {
        let mut channels = HashSet::new();
        for (index, voice) in self.voices.iter().enumerate() {
            if voice.channel > MAX_CHANNEL {
                return Err(MomentsError::ScoreError {
                    voice: index,
                    message: format!("channel {} is out of range (0-{})", voice.channel, MAX_CHANNEL),
                });
            }
            if !channels.insert(voice.channel) {
                return Err(MomentsError::ScoreError {
                    voice: index,
                    message: format!("channel {} is already used by another voice", voice.channel),
                });
            }
            voice.validate(index)?;
        }
        Ok(())
    }
}

impl Voice {
    fn validate(&self, index: usize) -> Result<(), MomentsError> {
        let error = |message: String| MomentsError::ScoreError { voice: index, message };

        let mut previous: Option<u32> = None;
        for item in &self.items {
            if let Some(prev) = previous {
                if item.position < prev {
                    return Err(error(format!(
                        "item at {}ms comes after an item at {}ms",
                        item.position, prev
                    )));
                }
            }
            previous = Some(item.position);

            if let Element::Chord(chord) = &item.element {
                if item.duration == 0 {
                    return Err(error(format!("chord at {}ms has zero duration", item.position)));
                }
                if item.position.checked_add(item.duration).is_none() {
                    return Err(error(format!(
                        "chord at {}ms lasting {}ms ends past the millisecond range",
                        item.position, item.duration
                    )));
                }
                if chord.pitches.is_empty() {
                    return Err(error(format!("chord at {}ms has no pitches", item.position)));
                }
                if chord.pitches.len() != chord.velocities.len() {
                    return Err(error(format!(
                        "chord at {}ms has {} pitches but {} velocities",
                        item.position,
                        chord.pitches.len(),
                        chord.velocities.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of chords (rests excluded)
    pub fn chord_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.element, Element::Chord(_)))
            .count()
    }
}
