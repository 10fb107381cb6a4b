pub mod config;
pub mod controller;
pub mod error;
pub mod score;
pub mod timeline;

pub use config::{PerformanceOptions, Role, RoleAssignment};
pub use controller::{ChannelState, ControllerCommand, ControllerKind, ControllerSettings};
pub use error::*;
pub use score::{Element, NotatedChord, Score, Voice, VoiceItem};
pub use timeline::{build_performance, ChordEvent, Moment, MomentRef, Performance, TimeControl};

/// Build a performance from YAML score and options documents.
/// This is the main entry point for the library; `None` options use the defaults.
pub fn assemble(score_source: &str, options_source: Option<&str>) -> Result<Performance, MomentsError> {
    let score = Score::from_yaml(score_source)?;
    let options = match options_source {
        Some(source) => PerformanceOptions::from_yaml(source)?,
        None => PerformanceOptions::default(),
    };
    build_performance(&score, &options)
}
