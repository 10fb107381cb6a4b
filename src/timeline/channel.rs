//! Channel timeline building
//!
//! Scans each voice in order, skipping rests, and collects its chords into a
//! sparse position -> [`Moment`] map. Positions and durations are divided by
//! the speed factor and truncated to whole milliseconds before use.

use std::collections::BTreeMap;

use crate::config::PerformanceOptions;
use crate::controller::ChannelState;
use crate::error::MomentsError;
use crate::score::{Element, Score, Voice};
use super::chord::{assemble_chord, ChordPlacement};
use super::types::Moment;

/// The moments of one voice, keyed by scaled position
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTimeline {
    pub voice: usize,
    pub channel: u8,
    pub moments: BTreeMap<u32, Moment>,
}

impl ChannelTimeline {
    pub fn first_position(&self) -> Option<u32> {
        self.moments.keys().next().copied()
    }
}

/// Divide notated milliseconds by the speed factor, truncating.
///
/// Kept in `u64` so slow speed factors cannot saturate; callers check the
/// result against the `u32` millisecond range.
pub fn scale(ms: u32, speed_factor: f64) -> u64 {
    (ms as f64 / speed_factor) as u64
}

/// Build one timeline per voice that has at least one retained chord.
///
/// Voices with only rests (or whose chords all fall before the start
/// position) produce no timeline. Two chords landing on the same scaled
/// position share one moment.
///
/// # Errors
/// [`MomentsError::ScoreError`] when a chord, once scaled, would end past
/// `u32::MAX` milliseconds.
pub fn build_channel_timelines(
    score: &Score,
    options: &PerformanceOptions,
) -> Result<Vec<ChannelTimeline>, MomentsError> {
    let mut timelines = Vec::new();
    for (index, voice) in score.voices.iter().enumerate() {
        if let Some(timeline) = build_channel_timeline(index, voice, options)? {
            timelines.push(timeline);
        }
    }
    Ok(timelines)
}

fn build_channel_timeline(
    voice_index: usize,
    voice: &Voice,
    options: &PerformanceOptions,
) -> Result<Option<ChannelTimeline>, MomentsError> {
    let mut state = ChannelState::new();
    let mut moments: BTreeMap<u32, Moment> = BTreeMap::new();

    for item in &voice.items {
        let chord = match &item.element {
            Element::Rest => continue,
            Element::Chord(chord) => chord,
        };
        if item.position < options.start_position {
            continue;
        }

        let onset = scale(item.position, options.speed_factor);
        // A chord never shrinks to nothing, even at high speed factors
        let duration = scale(item.duration, options.speed_factor).max(1);
        let end = onset.saturating_add(duration);
        if end > u64::from(u32::MAX) {
            return Err(MomentsError::ScoreError {
                voice: voice_index,
                message: format!(
                    "chord at {}ms ends at {}ms after scaling by speed factor {}, past the playable range",
                    item.position, end, options.speed_factor
                ),
            });
        }
        let (onset, duration) = (onset as u32, duration as u32);
        let placement = ChordPlacement {
            channel: voice.channel,
            voice: voice_index,
            onset,
            duration,
            notated_onset: item.position,
            notated_duration: item.duration,
            ornament_min_duration: options.ornament_min_duration,
        };
        let event = assemble_chord(chord, placement, &mut state);

        moments
            .entry(onset)
            .or_insert_with(|| Moment::new(onset))
            .chords
            .push(event);
    }

    if moments.is_empty() {
        tracing::debug!(voice = voice_index, channel = voice.channel, "voice has no chords, dropped");
        return Ok(None);
    }

    Ok(Some(ChannelTimeline { voice: voice_index, channel: voice.channel, moments }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{NotatedChord, VoiceItem};

    fn chord(position: u32, duration: u32) -> VoiceItem {
        VoiceItem {
            position,
            duration,
            element: Element::Chord(NotatedChord {
                pitches: vec![64],
                velocities: vec![64],
                ..Default::default()
            }),
        }
    }

    fn rest(position: u32, duration: u32) -> VoiceItem {
        VoiceItem { position, duration, element: Element::Rest }
    }

    #[test]
    fn test_rests_are_skipped() {
        let score = Score {
            voices: vec![Voice { channel: 0, items: vec![chord(0, 100), rest(100, 100), chord(200, 100)] }],
        };
        let timelines = build_channel_timelines(&score, &PerformanceOptions::default()).unwrap();

        assert_eq!(timelines.len(), 1);
        let keys: Vec<u32> = timelines[0].moments.keys().copied().collect();
        assert_eq!(keys, vec![0, 200]);
    }

    #[test]
    fn test_rest_only_voice_is_dropped() {
        let score = Score {
            voices: vec![
                Voice { channel: 0, items: vec![rest(0, 500)] },
                Voice { channel: 1, items: vec![chord(0, 100)] },
            ],
        };
        let timelines = build_channel_timelines(&score, &PerformanceOptions::default()).unwrap();

        assert_eq!(timelines.len(), 1);
        assert_eq!(timelines[0].voice, 1);
        assert_eq!(timelines[0].channel, 1);
    }

    #[test]
    fn test_speed_factor_scales_and_truncates() {
        let score = Score { voices: vec![Voice { channel: 0, items: vec![chord(0, 100), chord(301, 101)] }] };
        let options = PerformanceOptions { speed_factor: 2.0, ..Default::default() };
        let timelines = build_channel_timelines(&score, &options).unwrap();

        let second = &timelines[0].moments[&150];
        assert_eq!(second.chords[0].onset, 150);
        assert_eq!(second.chords[0].duration, 50);
    }

    #[test]
    fn test_rounding_collisions_merge() {
        // 100/3 and 101/3 both truncate to 33
        let score = Score { voices: vec![Voice { channel: 0, items: vec![chord(100, 30), chord(101, 30)] }] };
        let options = PerformanceOptions { speed_factor: 3.0, ..Default::default() };
        let timelines = build_channel_timelines(&score, &options).unwrap();

        assert_eq!(timelines[0].moments.len(), 1);
        assert_eq!(timelines[0].moments[&33].chords.len(), 2);
    }

    #[test]
    fn test_start_position_drops_earlier_chords_and_cold_starts_state() {
        let score = Score {
            voices: vec![Voice { channel: 0, items: vec![chord(0, 100), chord(100, 100), chord(200, 100)] }],
        };
        let options = PerformanceOptions { start_position: 100, ..Default::default() };
        let timelines = build_channel_timelines(&score, &options).unwrap();

        let keys: Vec<u32> = timelines[0].moments.keys().copied().collect();
        assert_eq!(keys, vec![100, 200]);
        assert_eq!(timelines[0].moments[&100].chords[0].controllers.len(), 5);
        assert!(timelines[0].moments[&200].chords[0].controllers.is_empty());
    }

    #[test]
    fn test_tiny_duration_never_reaches_zero() {
        let score = Score { voices: vec![Voice { channel: 0, items: vec![chord(0, 1)] }] };
        let options = PerformanceOptions { speed_factor: 4.0, ..Default::default() };
        let timelines = build_channel_timelines(&score, &options).unwrap();

        assert_eq!(timelines[0].moments[&0].chords[0].duration, 1);
    }

    #[test]
    fn test_slow_speed_stretches_without_saturating() {
        let score = Score { voices: vec![Voice { channel: 0, items: vec![chord(0, 100), chord(1_000, 100)] }] };
        let options = PerformanceOptions { speed_factor: 0.001, ..Default::default() };
        let timelines = build_channel_timelines(&score, &options).unwrap();

        let second = &timelines[0].moments[&1_000_000];
        assert_eq!(second.chords[0].duration, 100_000);
        assert_eq!(second.chords[0].notated_onset, 1_000);
    }

    #[test]
    fn test_scaled_chord_past_range_is_rejected() {
        // 5_000_000 / 0.001 = 5e9ms, beyond u32::MAX
        let score = Score {
            voices: vec![
                Voice { channel: 0, items: vec![chord(0, 100)] },
                Voice { channel: 1, items: vec![chord(5_000_000, 100)] },
            ],
        };
        let options = PerformanceOptions { speed_factor: 0.001, ..Default::default() };
        let result = build_channel_timelines(&score, &options);
        assert!(matches!(result, Err(MomentsError::ScoreError { voice: 1, .. })));
    }

    #[test]
    fn test_chord_ending_exactly_at_range_limit() {
        let score = Score { voices: vec![Voice { channel: 0, items: vec![chord(u32::MAX - 100, 100)] }] };
        let timelines = build_channel_timelines(&score, &PerformanceOptions::default()).unwrap();
        assert_eq!(timelines[0].moments[&(u32::MAX - 100)].end(), u32::MAX);
    }
}
