use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use super::TranscriptSource;
use crate::Result;

/// Transcript source backed by YouTube's caption tracks
pub struct YtTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YtTranscriptSource {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow::anyhow!("Failed to create transcript client: {}", e))?;

        Ok(Self { api })
    }
}

/// Disabled captions and a missing language degrade to "no transcript"
fn is_unavailable(error: &CouldNotRetrieveTranscript) -> bool {
    matches!(
        error.reason,
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled)
            | Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. })
    )
}

#[async_trait]
impl TranscriptSource for YtTranscriptSource {
    async fn fetch_lines(&self, video_id: &str, languages: &[String]) -> Result<Option<Vec<String>>> {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        match self.api.fetch_transcript(video_id, &languages, false).await {
            Ok(transcript) => {
                tracing::debug!(
                    "Fetched {} transcript lines for {}",
                    transcript.snippets.len(),
                    video_id
                );
                Ok(Some(
                    transcript
                        .snippets
                        .into_iter()
                        .map(|snippet| snippet.text)
                        .collect(),
                ))
            }
            Err(e) if is_unavailable(&e) => {
                tracing::debug!("Transcript unavailable for {}: {}", video_id, e);
                Ok(None)
            }
            Err(e) => Err(anyhow::anyhow!("{}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use yt_transcript_rs::TranscriptList;

    fn failure(reason: Option<CouldNotRetrieveTranscriptReason>) -> CouldNotRetrieveTranscript {
        CouldNotRetrieveTranscript {
            video_id: "dQw4w9WgXcQ".to_string(),
            reason,
        }
    }

    #[test]
    fn test_disabled_and_missing_language_are_unavailable() {
        assert!(is_unavailable(&failure(Some(
            CouldNotRetrieveTranscriptReason::TranscriptsDisabled
        ))));

        let no_czech = CouldNotRetrieveTranscriptReason::NoTranscriptFound {
            requested_language_codes: vec!["cs".to_string()],
            transcript_data: TranscriptList::new(
                "dQw4w9WgXcQ".to_string(),
                HashMap::new(),
                HashMap::new(),
                Vec::new(),
            ),
        };
        assert!(is_unavailable(&failure(Some(no_czech))));
    }

    #[test]
    fn test_other_failures_are_not_unavailable() {
        assert!(!is_unavailable(&failure(Some(
            CouldNotRetrieveTranscriptReason::RequestBlocked(None)
        ))));
        assert!(!is_unavailable(&failure(Some(
            CouldNotRetrieveTranscriptReason::VideoUnavailable
        ))));
        assert!(!is_unavailable(&failure(Some(
            CouldNotRetrieveTranscriptReason::YouTubeRequestFailed("HTTP 429".to_string())
        ))));
        assert!(!is_unavailable(&failure(None)));
    }
}
