//! Role partitioning
//!
//! Splits the per-channel moments into the performer's and the assistant's
//! sequences. Moments from different channels that share a position and a
//! role are merged, chords kept in voice order.

use std::collections::BTreeMap;

use crate::config::{Role, RoleAssignment};
use crate::error::MomentsError;
use super::channel::ChannelTimeline;
use super::types::Moment;

/// Position-ordered moments for the two playing roles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleSequences {
    pub performer: Vec<Moment>,
    pub assistant: Vec<Moment>,
}

/// Partition channel moments by role.
///
/// `breakpoints` are the onset positions (without the stop marker) in
/// ascending order. Roles are looked up by each timeline's voice index, after
/// the assistant-only remap. Silent voices are dropped.
///
/// # Errors
/// [`MomentsError::MalformedInput`] if a channel holds a moment at a position
/// that is not a breakpoint.
pub fn partition_roles(
    mut timelines: Vec<ChannelTimeline>,
    breakpoints: &[u32],
    roles: &RoleAssignment,
    assistant_only: bool,
) -> Result<RoleSequences, MomentsError> {
    let resolved: Vec<Role> = timelines
        .iter()
        .map(|t| roles.role_for(t.voice).resolve(assistant_only))
        .collect();

    let mut performer_buckets: BTreeMap<u32, Vec<Moment>> = BTreeMap::new();
    let mut assistant_buckets: BTreeMap<u32, Vec<Moment>> = BTreeMap::new();

    for &position in breakpoints {
        for (timeline, &role) in timelines.iter_mut().zip(&resolved) {
            let Some(moment) = timeline.moments.remove(&position) else {
                continue;
            };
            let buckets = match role {
                Role::LivePerformer => &mut performer_buckets,
                Role::Assistant => &mut assistant_buckets,
                Role::None => continue,
            };
            buckets.entry(position).or_default().push(moment);
        }
    }

    // Anything left over was never reached by a breakpoint
    if let Some(timeline) = timelines.iter().find(|t| !t.moments.is_empty()) {
        let position = timeline.first_position().unwrap_or_default();
        return Err(MomentsError::MalformedInput { channel: timeline.channel, position });
    }

    Ok(RoleSequences {
        performer: merge_buckets(performer_buckets),
        assistant: merge_buckets(assistant_buckets),
    })
}

fn merge_buckets(buckets: BTreeMap<u32, Vec<Moment>>) -> Vec<Moment> {
    buckets
        .into_iter()
        .map(|(position, mut moments)| {
            if moments.len() == 1 {
                return moments.remove(0);
            }
            let mut merged = Moment::new(position);
            for moment in moments {
                merged.chords.extend(moment.chords);
            }
            merged
        })
        .collect()
}
