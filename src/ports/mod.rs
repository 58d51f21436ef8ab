//! Ports (trait boundaries) for external collaborators.
//!
//! The training core depends only on these traits; concrete file formats and
//! data sources live in [`crate::adapters`].

pub mod observer;
pub mod policy;
pub mod repository;
pub mod samples;

pub use observer::{EpisodeSummary, Observer};
pub use policy::Policy;
pub use repository::ModelRepository;
pub use samples::{HistoricalSample, SampleLabel, SampleSource};
