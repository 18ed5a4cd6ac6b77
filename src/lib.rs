//! Channel Harvest - A Rust CLI tool for building local YouTube channel datasets
//!
//! This library resolves a channel handle, lists every upload published inside a date
//! range through the YouTube Data API, fetches a transcript for each video and writes
//! the result as `videos.csv` plus one text file per transcript.

pub mod cli;
pub mod config;
pub mod harvest;
pub mod output;
pub mod transcripts;
pub mod utils;
pub mod youtube;

pub use cli::Cli;
pub use config::Config;
pub use harvest::{HarvestPipeline, HarvestSummary};
pub use output::DatasetWriter;
pub use transcripts::{TranscriptFetcher, TranscriptOutcome, TranscriptResult, TranscriptSource};
pub use youtube::{DateRange, VideoCatalog, VideoRecord};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to a harvest run
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Could not resolve channel handle '{handle}': {reason}")]
    Resolution { handle: String, reason: String },

    #[error("Video listing failed: {0}")]
    Listing(String),

    #[error("Transcript fetch failed for video {video_id}: {reason}")]
    TranscriptFetch { video_id: String, reason: String },

    #[error("Failed to write output: {0}")]
    Output(String),
}
