/// Bilibili multi-part duration calculator
///
/// Normalizes a video identifier or link, fetches the part list, and sums
/// the durations of a selected `[from, to]` range at a given playback speed.

pub mod config;
pub mod durations;
pub mod error;
pub mod identifier;
pub mod parts;
pub mod render;
pub mod repl;
pub mod selection;
pub mod session;
pub mod timer;
pub mod upstream;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::durations::{compute_durations, format_duration, DerivedDurations};
pub use crate::error::{DomainError, RangeViolation, Result, UpstreamError};
pub use crate::identifier::extract_identifier;
pub use crate::parts::Part;
pub use crate::selection::{ClickOutcome, Field, Focus, SelectionEngine, SelectionWindow};
pub use crate::session::{Session, SessionSnapshot};
pub use crate::upstream::{create_provider, BackendClient, BilibiliClient, PartsProvider};
