//! Upload progress tracking

mod tracker;

pub use tracker::{ProgressTarget, UploadTracker};
