//! Podcast Player Core
//!
//! Platform-agnostic value types and error handling shared by the storage and
//! playback crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `EpisodeId`, `ProgressRecord`
//! - **Completion Rule**: the fixed 98% "finished" threshold
//! - **Display Helpers**: clock formatting and progress percentages
//! - **Error Handling**: Unified `PodcastError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use podcast_core::{is_finished, ProgressRecord, Track};
//!
//! let track = Track::new(
//!     "ep-42",
//!     "Episode 42",
//!     "The Show",
//!     "https://example.com/cover.jpg",
//!     "https://example.com/ep42.mp3",
//!     42,
//! );
//! assert!(track.validate().is_ok());
//!
//! assert!(is_finished(98.0, 100.0));
//! assert_eq!(ProgressRecord::default().progress, 0.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use error::{PodcastError, Result};
pub use time::{format_clock, progress_percent};
pub use types::{is_finished, EpisodeId, ProgressRecord, Track, FINISHED_THRESHOLD};
