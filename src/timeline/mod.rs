//! # Timeline Module
//!
//! Assemble the two playback schedules of an assisted performance from a
//! score's voices.
//!
//! ## Purpose
//! A performance is shared between a live performer and an automated
//! assistant. Each voice is given a role; this module turns the voices into:
//! 1. **Performer's moments** - what the human plays, in onset order
//! 2. **Assistant's moments** - what is played automatically, in onset order
//! 3. **Time controls** - one breakpoint table both schedules are measured against
//!
//! ## Pipeline
//! ```text
//! voices ─► channel timelines ─► leading silence removed ─► time controls
//!                                        │                        │
//!                                        └──────► partition ◄─────┘
//!                                                     │
//!                                  widths finalized, chords linked ─► Performance
//! ```
//!
//! ## Sub-modules
//! - `types` - ChordEvent, Moment, TimeControl, Performance
//! - `chord` - Builds one chord event with its controller deltas
//! - `channel` - Per-voice position -> moment maps
//! - `silence` - Shifts all channels so the first onset is 0
//! - `time_control` - The shared breakpoint table
//! - `partition` - Splits moments by role, merging same-position moments
//! - `finalize` - Moment widths and chord -> moment references
//!
//! ## Example
//! ```rust
//! use moments::{build_performance, PerformanceOptions, Role, RoleAssignment, Score};
//!
//! let score = Score::from_yaml(r#"
//! voices:
//!   - channel: 0
//!     items:
//!       - { position: 0, duration: 400, element: { kind: chord, pitches: [60], velocities: [80] } }
//!       - { position: 500, duration: 300, element: { kind: chord, pitches: [62], velocities: [80] } }
//!   - channel: 1
//!     items:
//!       - { position: 250, duration: 100, element: { kind: chord, pitches: [48], velocities: [70] } }
//! "#).unwrap();
//! let options = PerformanceOptions {
//!     roles: RoleAssignment::new(vec![Role::LivePerformer, Role::Assistant]),
//!     ..Default::default()
//! };
//!
//! let performance = build_performance(&score, &options).unwrap();
//! assert_eq!(performance.performers_moments.len(), 2);
//! assert_eq!(performance.assistants_moments[0].position, 250);
//! assert_eq!(performance.stop_position(), Some(800));
//! ```
//!
//! ## Rebuilding
//! Every call builds fresh moments from the score. Nothing from a previous
//! `Performance` is reused, so changing roles only needs another call.

mod types;
mod chord;
mod channel;
mod silence;
mod time_control;
mod partition;
mod finalize;


pub use types::{ChordEvent, Moment, MomentRef, Performance, TimeControl};
pub use chord::{assemble_chord, ChordPlacement};
pub use channel::{build_channel_timelines, ChannelTimeline};
pub use silence::normalize_leading_silence;
pub use time_control::build_time_controls;
pub use partition::{partition_roles, RoleSequences};
pub use finalize::{finalize_widths, link_back_references};

use crate::config::{PerformanceOptions, Role};
use crate::error::MomentsError;
use crate::score::Score;

/// Build both schedules and the breakpoint table for a score.
///
/// Options and score are validated first. A score in which every voice is
/// silent (or has no chords) yields an empty [`Performance`], not an error.
///
/// # Errors
/// - [`MomentsError::ConfigError`] for an invalid speed factor or role list
/// - [`MomentsError::ScoreError`] for invalid voice data, including chords that
///   end past `u32::MAX` ms once scaled by the speed factor
pub fn build_performance(score: &Score, options: &PerformanceOptions) -> Result<Performance, MomentsError> {
    options.validate()?;
    score.validate()?;

    if options.roles.wraps_unevenly(score.voices.len()) {
        tracing::warn!(
            voices = score.voices.len(),
            roles = options.roles.len(),
            "role assignment does not divide the voice count; roles wrap mid-cycle"
        );
    }

    let mut timelines = build_channel_timelines(score, options)?;
    tracing::debug!(
        channels = timelines.len(),
        chords = score.voices.iter().map(|v| v.chord_count()).sum::<usize>(),
        "built channel timelines"
    );

    normalize_leading_silence(&mut timelines);

    let time_controls = build_time_controls(&timelines);
    let breakpoints: Vec<u32> = time_controls
        .iter()
        .take(time_controls.len().saturating_sub(1))
        .map(|tc| tc.position)
        .collect();

    let RoleSequences { mut performer, mut assistant } =
        partition_roles(timelines, &breakpoints, &options.roles, options.assistant_only)?;

    finalize_widths(&mut performer);
    finalize_widths(&mut assistant);
    link_back_references(&mut performer, Role::LivePerformer);
    link_back_references(&mut assistant, Role::Assistant);

    let performance = Performance {
        performers_moments: performer,
        assistants_moments: assistant,
        time_controls,
    };

    if performance.is_empty() {
        tracing::info!("no voice is performed; both schedules are empty");
    } else {
        tracing::debug!(
            performer = performance.performers_moments.len(),
            assistant = performance.assistants_moments.len(),
            "partitioned moments"
        );
    }

    Ok(performance)
}
