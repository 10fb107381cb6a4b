//! Timeline type definitions
//!
//! The chord events, moments and breakpoint records produced by the engine,
//! plus the finished [`Performance`] handed to the playback host.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Role;
use crate::controller::ControllerCommand;

/// Non-owning reference from a chord to the moment that contains it.
///
/// `index` is the moment's place in the sequence for `role`
/// ([`Role::LivePerformer`] or [`Role::Assistant`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentRef {
    pub role: Role,
    pub index: usize,
}

/// A playable chord on one channel.
///
/// # Fields
/// - `onset`, `duration`: speed-scaled milliseconds; `onset` is relative to the
///   normalized start once the timeline is built
/// - `notated_onset`, `notated_duration`: the unscaled values from the score
/// - `pitches` .. `patch`: note data passed through from the score
/// - `controllers`: controller-set commands this chord must send first
/// - `ornament_min_duration`: threshold passed through from the options
/// - `container`: the moment holding this chord, set when sequences are linked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordEvent {
    pub channel: u8,
    pub voice: usize,
    pub onset: u32,
    pub duration: u32,
    pub notated_onset: u32,
    pub notated_duration: u32,
    pub pitches: Vec<u8>,
    pub velocities: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<u8>,
    pub controllers: Vec<ControllerCommand>,
    pub ornament_min_duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<MomentRef>,
}

/// All chords sounding at one onset position on one timeline.
///
/// `width` is the time until the next moment of the same sequence (or the
/// longest chord, for the last moment). It is zero until the sequence is
/// finalized and is only set by the width finalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
    pub position: u32,
    pub(crate) width: u32,
    pub chords: Vec<ChordEvent>,
}

impl Moment {
    pub fn new(position: u32) -> Self {
        Moment { position, width: 0, chords: Vec::new() }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Longest chord duration in this moment (0 when empty)
    pub fn max_chord_duration(&self) -> u32 {
        self.chords.iter().map(|c| c.duration).max().unwrap_or(0)
    }

    /// Position at which the longest chord stops sounding.
    ///
    /// Channel building rejects chords ending past `u32::MAX`, so this never clamps
    /// for a built timeline.
    pub fn end(&self) -> u32 {
        self.position.saturating_add(self.max_chord_duration())
    }
}

/// One segment of the shared notated-time axis
///
/// # Fields
/// - `position`, `width`: speed-scaled milliseconds; the terminal stop marker has width 0
/// - `notated_start`, `notated_duration`: the same segment in notated (unscaled)
///   milliseconds, measured from the notated position of the first breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeControl {
    pub position: u32,
    pub width: u32,
    pub notated_start: u32,
    pub notated_duration: u32,
}

/// Both playback schedules and the breakpoint table they share
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub performers_moments: Vec<Moment>,
    pub assistants_moments: Vec<Moment>,
    pub time_controls: Vec<TimeControl>,
}

impl Performance {
    /// True when every voice was silent
    pub fn is_empty(&self) -> bool {
        self.performers_moments.is_empty() && self.assistants_moments.is_empty()
    }

    /// The moment sequence for a role (`None` for [`Role::None`])
    pub fn moments(&self, role: Role) -> Option<&[Moment]> {
        match role {
            Role::LivePerformer => Some(self.performers_moments.as_slice()),
            Role::Assistant => Some(self.assistants_moments.as_slice()),
            Role::None => None,
        }
    }

    /// Resolve a chord's back-reference to its moment
    pub fn moment_of(&self, chord: &ChordEvent) -> Option<&Moment> {
        let container = chord.container?;
        self.moments(container.role)?.get(container.index)
    }

    /// Position where the last chord stops (the terminal breakpoint)
    pub fn stop_position(&self) -> Option<u32> {
        self.time_controls.last().map(|tc| tc.position)
    }

    /// The breakpoint segment containing `position`
    pub fn time_control_at(&self, position: u32) -> Option<&TimeControl> {
        let idx = self.time_controls.partition_point(|tc| tc.position <= position);
        if idx == 0 {
            None
        } else {
            self.time_controls.get(idx - 1)
        }
    }

    /// Position -> 1-based moment number over the performer's schedule
    pub fn performer_lookup(&self) -> BTreeMap<u32, usize> {
        moment_numbers(&self.performers_moments)
    }

    /// Position -> 1-based moment number over the assistant's schedule
    pub fn assistant_lookup(&self) -> BTreeMap<u32, usize> {
        moment_numbers(&self.assistants_moments)
    }

    /// The lookup a host shows by default: the performer's schedule when it
    /// has moments, otherwise the assistant's.
    pub fn host_lookup(&self) -> BTreeMap<u32, usize> {
        if self.performers_moments.is_empty() {
            self.assistant_lookup()
        } else {
            self.performer_lookup()
        }
    }
}

fn moment_numbers(moments: &[Moment]) -> BTreeMap<u32, usize> {
    moments
        .iter()
        .enumerate()
        .map(|(i, m)| (m.position, i + 1))
        .collect()
}
