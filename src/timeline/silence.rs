//! Leading-silence normalization
//!
//! All channels share one notated timeline, so the shift is applied to every
//! channel or to none.

use std::collections::BTreeMap;

use super::channel::ChannelTimeline;

/// Shift every channel left so the earliest onset lands on 0.
///
/// Returns the shift that was applied (0 when some channel already starts at
/// 0 or there are no channels). Chord onsets move with their moments.
pub fn normalize_leading_silence(timelines: &mut [ChannelTimeline]) -> u32 {
    let offset = match timelines.iter().filter_map(ChannelTimeline::first_position).min() {
        Some(min) if min > 0 => min,
        _ => return 0,
    };

    for timeline in timelines.iter_mut() {
        let shifted: BTreeMap<u32, _> = std::mem::take(&mut timeline.moments)
            .into_values()
            .map(|mut moment| {
                moment.position -= offset;
                for chord in &mut moment.chords {
                    chord.onset -= offset;
                }
                (moment.position, moment)
            })
            .collect();
        timeline.moments = shifted;
    }

    tracing::debug!(offset, "removed leading silence");
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PerformanceOptions;
    use crate::score::{Element, NotatedChord, Score, Voice, VoiceItem};
    use crate::timeline::channel::build_channel_timelines;

    fn voice(channel: u8, positions: &[u32]) -> Voice {
        Voice {
            channel,
            items: positions
                .iter()
                .map(|&position| VoiceItem {
                    position,
                    duration: 100,
                    element: Element::Chord(NotatedChord {
                        pitches: vec![60],
                        velocities: vec![80],
                        ..Default::default()
                    }),
                })
                .collect(),
        }
    }

    fn timelines(voices: Vec<Voice>) -> Vec<ChannelTimeline> {
        build_channel_timelines(&Score { voices }, &PerformanceOptions::default()).unwrap()
    }

    #[test]
    fn test_shifts_all_channels_by_global_minimum() {
        let mut tls = timelines(vec![voice(0, &[200, 700]), voice(1, &[450])]);
        let offset = normalize_leading_silence(&mut tls);

        assert_eq!(offset, 200);
        assert_eq!(tls[0].moments.keys().copied().collect::<Vec<_>>(), vec![0, 500]);
        assert_eq!(tls[1].moments.keys().copied().collect::<Vec<_>>(), vec![250]);
        assert_eq!(tls[1].moments[&250].position, 250);
        assert_eq!(tls[1].moments[&250].chords[0].onset, 250);
    }

    #[test]
    fn test_no_shift_when_a_channel_starts_at_zero() {
        let mut tls = timelines(vec![voice(0, &[300]), voice(1, &[0, 100])]);
        let before = tls.clone();

        assert_eq!(normalize_leading_silence(&mut tls), 0);
        assert_eq!(tls, before);
    }

    #[test]
    fn test_no_channels() {
        let mut tls: Vec<ChannelTimeline> = Vec::new();
        assert_eq!(normalize_leading_silence(&mut tls), 0);
    }
}
