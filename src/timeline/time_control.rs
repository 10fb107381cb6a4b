//! Breakpoint table construction
//!
//! Every onset on every channel becomes a breakpoint. The table ends with a
//! stop marker at the point where the last-sounding chord finishes.
//!
//! ```text
//! channel 0:  |0-------400|    |500-----800|
//! channel 1:       |250-350|
//! breakpoints: 0   250         500         800(stop)
//! widths:      250 250         300         0
//! ```

use std::collections::{BTreeMap, BTreeSet};

use super::channel::ChannelTimeline;
use super::types::TimeControl;

/// Sorted, de-duplicated onset positions across all channels
pub fn collect_breakpoints(timelines: &[ChannelTimeline]) -> Vec<u32> {
    timelines
        .iter()
        .flat_map(|t| t.moments.keys().copied())
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

/// Overall stop position: the latest `position + longest chord` of any moment
pub fn stop_position(timelines: &[ChannelTimeline]) -> Option<u32> {
    timelines
        .iter()
        .flat_map(|t| t.moments.values())
        .map(|m| m.end())
        .max()
}

/// Earliest notated onset at each scaled breakpoint, and the latest notated end
fn notated_marks(timelines: &[ChannelTimeline]) -> (BTreeMap<u32, u32>, u32) {
    let mut starts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut stop = 0;
    for moment in timelines.iter().flat_map(|t| t.moments.values()) {
        for chord in &moment.chords {
            starts
                .entry(moment.position)
                .and_modify(|n| *n = (*n).min(chord.notated_onset))
                .or_insert(chord.notated_onset);
            stop = stop.max(chord.notated_onset.saturating_add(chord.notated_duration));
        }
    }
    (starts, stop)
}

/// Build the shared breakpoint table from normalized timelines.
///
/// Each breakpoint's width reaches to the next breakpoint; the terminal stop
/// marker has width 0. `notated_start` is the earliest notated onset among
/// the breakpoint's chords, counted from the first breakpoint, so it is exact
/// whatever the speed factor. No timelines means no table.
pub fn build_time_controls(timelines: &[ChannelTimeline]) -> Vec<TimeControl> {
    let Some(stop) = stop_position(timelines) else {
        return Vec::new();
    };
    let (notated_starts, notated_stop) = notated_marks(timelines);

    let mut marks: Vec<(u32, u32)> = collect_breakpoints(timelines)
        .into_iter()
        .map(|position| (position, notated_starts.get(&position).copied().unwrap_or_default()))
        .collect();
    let origin = marks.first().map_or(0, |&(_, notated)| notated);
    marks.push((stop, notated_stop));

    let controls: Vec<TimeControl> = marks
        .iter()
        .enumerate()
        .map(|(i, &(position, notated))| {
            let (width, notated_duration) = marks
                .get(i + 1)
                .map_or((0, 0), |&(next, next_notated)| (next - position, next_notated.saturating_sub(notated)));
            TimeControl {
                position,
                width,
                notated_start: notated - origin,
                notated_duration,
            }
        })
        .collect();

    tracing::debug!(breakpoints = controls.len() - 1, stop, "built time controls");
    controls
}
