//! # Channel Controller State
//!
//! Tracks the last controller values sent on one MIDI channel so that chord
//! assembly only emits the controller changes that actually alter what the
//! instrument is doing.
//!
//! ## Controller Categories
//!
//! | Category              | Default | MIDI message                   |
//! |-----------------------|---------|--------------------------------|
//! | Expression            | 100     | CC 11                          |
//! | Modulation wheel      | 0       | CC 1                           |
//! | Pan                   | 64      | CC 10                          |
//! | Pitch-wheel deviation | 2       | RPN 0 (pitch bend sensitivity) |
//! | Pitch wheel           | 64      | Pitch bend (64 = centre)       |
//!
//! ## Diff Rules
//! - A value the chord requests is emitted only if it differs from the value
//!   the channel already holds.
//! - A category the chord leaves unset emits nothing: the previous value is
//!   still active on the instrument.
//! - A category the channel has never set is filled with its default, so the
//!   first chord on a cold channel leaves every category defined.
//!
//! ## Example
//! ```rust
//! use moments::{ChannelState, ControllerKind, ControllerSettings};
//!
//! let mut state = ChannelState::new();
//! let first = state.apply(&ControllerSettings { pan: Some(20), ..Default::default() });
//! assert_eq!(first.len(), 5); // pan plus four defaults
//!
//! let second = state.apply(&ControllerSettings { pan: Some(20), ..Default::default() });
//! assert!(second.is_empty());
//! assert_eq!(state.get(ControllerKind::Pan), Some(20));
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_EXPRESSION: u8 = 100;
pub const DEFAULT_MODULATION: u8 = 0;
pub const DEFAULT_PAN: u8 = 64;
pub const DEFAULT_PITCH_WHEEL_DEVIATION: u8 = 2;
pub const DEFAULT_PITCH_WHEEL: u8 = 64;

/// The five controller categories a chord may set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerKind {
    Expression,
    Modulation,
    Pan,
    PitchWheelDeviation,
    PitchWheel,
}

impl ControllerKind {
    /// All categories, in the order commands are emitted
    pub const ALL: [ControllerKind; 5] = [
        ControllerKind::Expression,
        ControllerKind::Modulation,
        ControllerKind::Pan,
        ControllerKind::PitchWheelDeviation,
        ControllerKind::PitchWheel,
    ];

    pub fn default_value(self) -> u8 {
        match self {
            ControllerKind::Expression => DEFAULT_EXPRESSION,
            ControllerKind::Modulation => DEFAULT_MODULATION,
            ControllerKind::Pan => DEFAULT_PAN,
            ControllerKind::PitchWheelDeviation => DEFAULT_PITCH_WHEEL_DEVIATION,
            ControllerKind::PitchWheel => DEFAULT_PITCH_WHEEL,
        }
    }

    fn index(self) -> usize {
        match self {
            ControllerKind::Expression => 0,
            ControllerKind::Modulation => 1,
            ControllerKind::Pan => 2,
            ControllerKind::PitchWheelDeviation => 3,
            ControllerKind::PitchWheel => 4,
        }
    }
}

/// Explicit controller values notated on a chord.
///
/// Every field is optional; `None` means "leave the channel as it is".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControllerSettings {
    pub expression: Option<u8>,
    pub modulation: Option<u8>,
    pub pan: Option<u8>,
    pub pitch_wheel_deviation: Option<u8>,
    pub pitch_wheel: Option<u8>,
}

impl ControllerSettings {
    pub fn get(&self, kind: ControllerKind) -> Option<u8> {
        match kind {
            ControllerKind::Expression => self.expression,
            ControllerKind::Modulation => self.modulation,
            ControllerKind::Pan => self.pan,
            ControllerKind::PitchWheelDeviation => self.pitch_wheel_deviation,
            ControllerKind::PitchWheel => self.pitch_wheel,
        }
    }
}

/// A single controller-set command attached to a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerCommand {
    pub kind: ControllerKind,
    pub value: u8,
}

impl ControllerCommand {
    /// Render the command as raw MIDI channel-voice bytes.
    ///
    /// Values are clamped to the 7-bit range. Pitch-wheel deviation is sent
    /// as the RPN 0 sequence (select, data entry, reset to null RPN), and the
    /// pitch-wheel value becomes the MSB of a 14-bit bend, so 64 is centre.
    ///
    /// # Example
    /// ```
    /// use moments::{ControllerCommand, ControllerKind};
    ///
    /// let pan = ControllerCommand { kind: ControllerKind::Pan, value: 20 };
    /// assert_eq!(pan.midi_bytes(3), vec![0xB3, 10, 20]);
    /// ```
    pub fn midi_bytes(&self, channel: u8) -> Vec<u8> {
        let ch = channel & 0x0F;
        let value = self.value.min(127);
        let cc = 0xB0 | ch;
        match self.kind {
            ControllerKind::Expression => vec![cc, 11, value],
            ControllerKind::Modulation => vec![cc, 1, value],
            ControllerKind::Pan => vec![cc, 10, value],
            ControllerKind::PitchWheelDeviation => vec![
                cc, 101, 0, // RPN MSB
                cc, 100, 0, // RPN LSB: pitch bend sensitivity
                cc, 6, value, // semitones
                cc, 38, 0, // cents
                cc, 101, 127, // null RPN
                cc, 100, 127,
            ],
            ControllerKind::PitchWheel => vec![0xE0 | ch, 0, value],
        }
    }
}

/// Last-known controller values for one channel.
///
/// Created fresh (all categories unknown) at the start of a build pass and
/// fed chords in ascending onset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    values: [Option<u8>; 5],
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ControllerKind) -> Option<u8> {
        self.values[kind.index()]
    }

    /// True once every category has been set at least once
    pub fn is_fully_defined(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Apply a chord's requested values and return the commands it needs.
    ///
    /// Unset categories on a cold channel are filled with their defaults.
    pub fn apply(&mut self, requested: &ControllerSettings) -> Vec<ControllerCommand> {
        let mut commands = Vec::new();
        for kind in ControllerKind::ALL {
            let slot = &mut self.values[kind.index()];
            let wanted = match (requested.get(kind), *slot) {
                (Some(value), _) => value,
                (None, None) => kind.default_value(),
                (None, Some(_)) => continue,
            };
            if *slot != Some(wanted) {
                tracing::trace!(?kind, value = wanted, "controller change");
                *slot = Some(wanted);
                commands.push(ControllerCommand { kind, value: wanted });
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cold_channel_gets_all_defaults() {
        let mut state = ChannelState::new();
        let commands = state.apply(&ControllerSettings::default());

        assert_eq!(commands.len(), 5);
        assert!(state.is_fully_defined());
        assert_eq!(state.get(ControllerKind::Expression), Some(100));
        assert_eq!(state.get(ControllerKind::Modulation), Some(0));
        assert_eq!(state.get(ControllerKind::Pan), Some(64));
        assert_eq!(state.get(ControllerKind::PitchWheelDeviation), Some(2));
        assert_eq!(state.get(ControllerKind::PitchWheel), Some(64));
    }

    #[test]
    fn test_explicit_value_overrides_default_on_cold_channel() {
        let mut state = ChannelState::new();
        let commands = state.apply(&ControllerSettings {
            expression: Some(70),
            ..Default::default()
        });

        assert_eq!(commands[0], ControllerCommand { kind: ControllerKind::Expression, value: 70 });
        assert!(!commands.iter().any(|c| c.kind == ControllerKind::Expression && c.value == 100));
    }

    #[test]
    fn test_unset_category_keeps_previous_value() {
        let mut state = ChannelState::new();
        state.apply(&ControllerSettings { modulation: Some(40), ..Default::default() });

        let commands = state.apply(&ControllerSettings::default());
        assert!(commands.is_empty());
        assert_eq!(state.get(ControllerKind::Modulation), Some(40));
    }

    #[test]
    fn test_only_differing_categories_emit() {
        let mut state = ChannelState::new();
        let settings = ControllerSettings {
            expression: Some(90),
            pan: Some(30),
            pitch_wheel: Some(64),
            ..Default::default()
        };
        state.apply(&settings);

        let commands = state.apply(&ControllerSettings {
            expression: Some(90),
            pan: Some(31),
            pitch_wheel: Some(70),
            ..Default::default()
        });
        assert_eq!(
            commands,
            vec![
                ControllerCommand { kind: ControllerKind::Pan, value: 31 },
                ControllerCommand { kind: ControllerKind::PitchWheel, value: 70 },
            ]
        );
    }

    #[test]
    fn test_requesting_the_default_after_cold_start_is_silent() {
        let mut state = ChannelState::new();
        state.apply(&ControllerSettings::default());

        let commands = state.apply(&ControllerSettings { pan: Some(64), ..Default::default() });
        assert!(commands.is_empty());
    }

    #[test]
    fn test_midi_bytes() {
        let expression = ControllerCommand { kind: ControllerKind::Expression, value: 100 };
        assert_eq!(expression.midi_bytes(0), vec![0xB0, 11, 100]);

        let modulation = ControllerCommand { kind: ControllerKind::Modulation, value: 200 };
        assert_eq!(modulation.midi_bytes(1), vec![0xB1, 1, 127]);

        let bend = ControllerCommand { kind: ControllerKind::PitchWheel, value: 64 };
        assert_eq!(bend.midi_bytes(15), vec![0xEF, 0, 64]);

        let deviation = ControllerCommand { kind: ControllerKind::PitchWheelDeviation, value: 12 };
        let bytes = deviation.midi_bytes(2);
        assert_eq!(bytes.len(), 18);
        assert_eq!(&bytes[6..9], &[0xB2, 6, 12]);
    }
}
