use chrono::SecondsFormat;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::transcripts::{TranscriptOutcome, TranscriptResult};
use crate::utils::sanitize_filename;
use crate::youtube::VideoRecord;
use crate::HarvestError;

pub const VIDEOS_FILE: &str = "videos.csv";
pub const TRANSCRIPTS_DIR: &str = "transcripts";

const CSV_HEADER: [&str; 8] = [
    "video_id",
    "published_at",
    "title",
    "description",
    "view_count",
    "like_count",
    "comment_count",
    "transcript_path",
];

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    video_id: &'a str,
    published_at: String,
    title: &'a str,
    description: &'a str,
    view_count: Option<u64>,
    like_count: Option<u64>,
    comment_count: Option<u64>,
    transcript_path: Option<String>,
}

/// What the writer put on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub csv_path: PathBuf,
    pub rows: usize,
    pub transcript_files: usize,
}

/// Writes `videos.csv` and `transcripts/<video_id>.txt` under an output directory
pub struct DatasetWriter {
    output_dir: PathBuf,
}

fn output_error(context: &str, e: impl std::fmt::Display) -> HarvestError {
    HarvestError::Output(format!("{}: {}", context, e))
}

impl DatasetWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Relative path of a video's transcript inside the output directory
    pub fn transcript_relative_path(video_id: &str) -> String {
        format!("{}/{}.txt", TRANSCRIPTS_DIR, sanitize_filename(video_id))
    }

    /// Write one CSV row per video and one text file per non-empty transcript.
    ///
    /// Files are written one by one; a failure part way leaves what was already written.
    pub fn write(
        &self,
        videos: &[VideoRecord],
        transcripts: &[TranscriptResult],
    ) -> Result<WriteReport, HarvestError> {
        let transcripts_dir = self.output_dir.join(TRANSCRIPTS_DIR);
        fs_err::create_dir_all(&transcripts_dir)
            .map_err(|e| output_error("failed to create output directory", e))?;

        let by_id: HashMap<&str, &TranscriptOutcome> = transcripts
            .iter()
            .map(|result| (result.video_id.as_str(), &result.outcome))
            .collect();

        let csv_path = self.output_dir.join(VIDEOS_FILE);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(&csv_path)
            .map_err(|e| output_error(&format!("failed to create {}", csv_path.display()), e))?;
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| output_error("failed to write CSV header", e))?;

        let mut transcript_files = 0;
        for video in videos {
            let transcript_path = match by_id.get(video.id.as_str()).and_then(|o| o.text()) {
                Some(text) => {
                    let relative = Self::transcript_relative_path(&video.id);
                    fs_err::write(self.output_dir.join(&relative), text)
                        .map_err(|e| output_error("failed to write transcript", e))?;
                    transcript_files += 1;
                    Some(relative)
                }
                None => None,
            };

            writer
                .serialize(CsvRow {
                    video_id: &video.id,
                    published_at: video.published_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    title: &video.title,
                    description: &video.description,
                    view_count: video.view_count,
                    like_count: video.like_count,
                    comment_count: video.comment_count,
                    transcript_path,
                })
                .map_err(|e| output_error(&format!("failed to write row for {}", video.id), e))?;
        }

        writer
            .flush()
            .map_err(|e| output_error(&format!("failed to flush {}", csv_path.display()), e))?;

        tracing::info!(
            "Wrote {} rows to {} and {} transcript files",
            videos.len(),
            csv_path.display(),
            transcript_files
        );

        Ok(WriteReport {
            csv_path,
            rows: videos.len(),
            transcript_files,
        })
    }
}
