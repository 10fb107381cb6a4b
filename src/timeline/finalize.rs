//! Width finalization and back-reference linking
//!
//! Widths are local to each role's sequence: a moment lasts until the next
//! moment *of the same sequence*, not until the next global breakpoint.

use crate::config::Role;
use super::types::{Moment, MomentRef};

/// Set every moment's width from its successor; the last moment takes the
/// duration of its longest chord.
pub fn finalize_widths(moments: &mut [Moment]) {
    let count = moments.len();
    for i in 0..count {
        let width = if i + 1 < count {
            moments[i + 1].position - moments[i].position
        } else {
            moments[i].max_chord_duration()
        };
        moments[i].width = width;
    }
}

/// Point every chord at the moment that holds it
pub fn link_back_references(moments: &mut [Moment], role: Role) {
    for (index, moment) in moments.iter_mut().enumerate() {
        for chord in &mut moment.chords {
            chord.container = Some(MomentRef { role, index });
        }
    }
}
