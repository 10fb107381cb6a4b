//! Chord assembly
//!
//! Turns a notated chord plus its scaled timing into a [`ChordEvent`],
//! attaching only the controller commands the channel state says are needed.

use crate::controller::ChannelState;
use crate::score::NotatedChord;
use super::types::ChordEvent;

/// Where and when a chord is placed
#[derive(Debug, Clone, Copy)]
pub struct ChordPlacement {
    pub channel: u8,
    pub voice: usize,
    pub onset: u32,
    pub duration: u32,
    /// Unscaled position and duration as written in the score
    pub notated_onset: u32,
    pub notated_duration: u32,
    pub ornament_min_duration: u32,
}

/// Build one playable chord and advance the channel state.
///
/// Chords must be fed in ascending onset order for each channel. The first
/// chord assembled against a fresh [`ChannelState`] carries commands for all
/// five controller categories.
pub fn assemble_chord(
    chord: &NotatedChord,
    placement: ChordPlacement,
    state: &mut ChannelState,
) -> ChordEvent {
    let controllers = state.apply(&chord.controllers);

    ChordEvent {
        channel: placement.channel,
        voice: placement.voice,
        onset: placement.onset,
        duration: placement.duration,
        notated_onset: placement.notated_onset,
        notated_duration: placement.notated_duration,
        pitches: chord.pitches.clone(),
        velocities: chord.velocities.clone(),
        lyric: chord.lyric.clone(),
        bank: chord.bank,
        patch: chord.patch,
        controllers,
        ornament_min_duration: placement.ornament_min_duration,
        container: None,
    }
}
