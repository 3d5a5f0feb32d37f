//! Domain types for episodes and listening progress

mod ids;
mod progress;
mod track;

pub use ids::EpisodeId;
pub use progress::{is_finished, ProgressRecord, FINISHED_THRESHOLD};
pub use track::Track;
