use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use indicatif::ProgressBar;

pub mod youtube;

pub use youtube::YtTranscriptSource;

use crate::{HarvestError, Result};

/// What a transcript lookup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// Transcript lines joined with newlines; may be empty
    Available(String),

    /// Transcripts are disabled or missing in every requested language
    Unavailable,
}

impl TranscriptOutcome {
    /// Text worth writing to disk, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            TranscriptOutcome::Available(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Transcript lookup result for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptResult {
    pub video_id: String,
    pub outcome: TranscriptOutcome,
}

/// Transcripts for a list of videos plus the per-video failures
#[derive(Debug, Default)]
pub struct TranscriptBatch {
    pub results: Vec<TranscriptResult>,
    pub failures: Vec<HarvestError>,
}

/// Backend able to retrieve caption lines for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch transcript lines in the first available language of `languages`.
    ///
    /// Returns `Ok(None)` when transcripts are disabled or none exists in the
    /// requested languages. Every other problem is an error.
    async fn fetch_lines(&self, video_id: &str, languages: &[String]) -> Result<Option<Vec<String>>>;
}

/// Fetches transcripts with per-video error isolation
pub struct TranscriptFetcher {
    source: Box<dyn TranscriptSource>,
    languages: Vec<String>,
    concurrency: usize,
}

impl TranscriptFetcher {
    pub fn new(source: Box<dyn TranscriptSource>, languages: Vec<String>, concurrency: usize) -> Self {
        Self {
            source,
            languages,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch the transcript of a single video
    pub async fn fetch(&self, video_id: &str) -> std::result::Result<TranscriptOutcome, HarvestError> {
        tracing::debug!("Fetching transcript for {} ({})", video_id, self.languages.join(", "));

        match self.source.fetch_lines(video_id, &self.languages).await {
            Ok(Some(lines)) => Ok(TranscriptOutcome::Available(lines.join("\n"))),
            Ok(None) => Ok(TranscriptOutcome::Unavailable),
            Err(e) => Err(HarvestError::TranscriptFetch {
                video_id: video_id.to_string(),
                reason: format!("{:#}", e),
            }),
        }
    }

    /// Fetch transcripts for every id, keeping input order.
    ///
    /// At most `concurrency` requests are in flight. A failure only affects its own
    /// video: it is logged and reported in [`TranscriptBatch::failures`].
    pub async fn fetch_all(&self, video_ids: &[String], progress: &ProgressBar) -> TranscriptBatch {
        let outcomes: Vec<_> = stream::iter(video_ids)
            .map(|video_id| async move {
                let outcome = self.fetch(video_id).await;
                progress.inc(1);
                (video_id, outcome)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut batch = TranscriptBatch::default();
        for (video_id, outcome) in outcomes {
            match outcome {
                Ok(outcome) => {
                    if outcome == TranscriptOutcome::Unavailable {
                        tracing::info!("No transcript available for {}", video_id);
                    }
                    batch.results.push(TranscriptResult {
                        video_id: video_id.clone(),
                        outcome,
                    });
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    batch.failures.push(e);
                }
            }
        }

        batch
    }
}
