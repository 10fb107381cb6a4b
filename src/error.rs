//! # Error Types
//!
//! This module defines all error types for the moments engine.
//!
//! Every error names the place where the input went wrong (a voice index, a
//! channel and position, or the configuration key) so a host can point the
//! user at the offending data.
//!
//! ## Error Types
//! - `ConfigError` - Invalid performance options (speed factor, role list)
//! - `ScoreError` - Invalid voice data, reported with the voice index
//! - `MalformedInput` - A moment position missing from the breakpoint table
//! - `YamlError` - A score or options document that could not be deserialized
//!
//! An empty performance (every voice silent) is *not* an error: both output
//! sequences are simply empty.
//!
//! ## Usage
//! ```rust
//! use moments::{assemble, MomentsError};
//!
//! match assemble("voices: []", Some("speed-factor: 0")) {
//!     Ok(performance) => println!("{} moments", performance.performers_moments.len()),
//!     Err(MomentsError::ConfigError(message)) => eprintln!("Bad options: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MomentsError {
    /// Invalid performance configuration.
    ///
    /// # Example
    /// ```
    /// # use moments::MomentsError;
    /// let err = MomentsError::ConfigError("speed-factor must be greater than 0".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: speed-factor must be greater than 0");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Invalid voice data in the score.
    ///
    /// # Example
    /// ```
    /// # use moments::MomentsError;
    /// let err = MomentsError::ScoreError {
    ///     voice: 2,
    ///     message: "chord at 480ms has zero duration".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Score error in voice 2: chord at 480ms has zero duration");
    /// ```
    #[error("Score error in voice {voice}: {message}")]
    ScoreError { voice: usize, message: String },

    /// A moment sits at a position the breakpoint table does not contain.
    #[error("Malformed input: channel {channel} has a moment at {position}ms with no breakpoint")]
    MalformedInput { channel: u8, position: u32 },

    #[error("YAML error: {0}")]
    YamlError(String),
}

impl From<serde_yaml::Error> for MomentsError {
    fn from(e: serde_yaml::Error) -> Self {
        MomentsError::YamlError(e.to_string())
    }
}
