use anyhow::Context;
use console::style;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::output::DatasetWriter;
use crate::transcripts::{TranscriptFetcher, TranscriptOutcome, TranscriptSource, YtTranscriptSource};
use crate::utils::{counter, format_duration, spinner};
use crate::youtube::{ChannelResolver, DataApiClient, DateRange, VideoCatalog, VideoLister};
use crate::HarvestError;

/// Outcome of a completed harvest run
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSummary {
    /// Resolved channel id
    pub channel_id: String,

    /// Rows written to videos.csv
    pub videos: usize,

    /// Transcript files written
    pub transcripts_written: usize,

    /// Videos without any transcript in the requested languages
    pub transcripts_unavailable: usize,

    /// Videos whose transcript fetch failed
    pub transcript_failures: usize,

    /// Path of videos.csv
    pub csv_path: PathBuf,

    /// Wall clock duration in seconds
    pub elapsed_secs: f64,
}

impl HarvestSummary {
    /// Print a short human readable report
    pub fn display(&self) {
        println!("{}", style("Harvest complete").green().bold());
        println!("  Channel:               {}", self.channel_id);
        println!("  Videos in range:       {}", self.videos);
        println!("  Transcripts written:   {}", self.transcripts_written);
        println!("  Without transcript:    {}", self.transcripts_unavailable);
        if self.transcript_failures > 0 {
            println!(
                "  {}",
                style(format!("Transcript failures:   {}", self.transcript_failures)).yellow()
            );
        }
        println!("  Output:                {}", self.csv_path.display());
        println!("  Took:                  {}", format_duration(self.elapsed_secs));
    }
}

/// Main harvest pipeline
pub struct HarvestPipeline {
    config: Config,
    catalog: Box<dyn VideoCatalog>,
    transcripts: TranscriptFetcher,
    writer: DatasetWriter,
}

impl HarvestPipeline {
    /// Create a pipeline talking to YouTube
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = DataApiClient::new(&config.youtube).context("Failed to create YouTube Data API client")?;
        let source = YtTranscriptSource::new()?;

        Ok(Self::with_components(config, Box::new(catalog), Box::new(source)))
    }

    /// Create a pipeline from explicit collaborators
    pub fn with_components(
        config: Config,
        catalog: Box<dyn VideoCatalog>,
        source: Box<dyn TranscriptSource>,
    ) -> Self {
        let transcripts = TranscriptFetcher::new(
            source,
            config.harvest.languages.clone(),
            config.harvest.transcript_concurrency,
        );
        let writer = DatasetWriter::new(config.harvest.output_dir.clone());

        Self {
            config,
            catalog,
            transcripts,
            writer,
        }
    }

    /// Resolve the handle, list videos in `range`, fetch transcripts and write the dataset
    pub async fn run(&self, handle: &str, range: &DateRange) -> Result<HarvestSummary, HarvestError> {
        let started = Instant::now();
        let quiet = self.config.harvest.quiet;

        // Resolve channel
        let progress = spinner(&format!("Resolving {}...", handle), quiet);
        let resolver = ChannelResolver::new(&*self.catalog);
        let resolved = resolver.resolve(handle).await;
        let channel_id = match resolved {
            Ok(id) => id,
            Err(e) => {
                progress.abandon_with_message("Channel resolution failed");
                return Err(e);
            }
        };
        progress.finish_with_message(format!("Resolved {} to {}", handle, channel_id));

        // List uploads in range
        let progress = spinner("Listing uploads...", quiet);
        let listed = match resolver.uploads_playlist(&channel_id).await {
            Ok(playlist_id) => {
                VideoLister::new(&*self.catalog, self.config.harvest.assume_descending)
                    .list_videos(&playlist_id, range, &progress)
                    .await
            }
            Err(e) => Err(e),
        };
        let videos = match listed {
            Ok(videos) => videos,
            Err(e) => {
                progress.abandon_with_message("Listing failed");
                return Err(e);
            }
        };
        progress.finish_with_message(format!("Found {} videos published in {}", videos.len(), range));

        // Fetch transcripts
        let ids: Vec<String> = videos.iter().map(|video| video.id.clone()).collect();
        let progress = counter(ids.len() as u64, "Fetching transcripts", quiet);
        let batch = self.transcripts.fetch_all(&ids, &progress).await;
        progress.finish_with_message("Transcripts done");

        let transcripts_unavailable = batch
            .results
            .iter()
            .filter(|result| result.outcome == TranscriptOutcome::Unavailable)
            .count();

        // Write outputs
        let report = self.writer.write(&videos, &batch.results)?;

        Ok(HarvestSummary {
            channel_id,
            videos: report.rows,
            transcripts_written: report.transcript_files,
            transcripts_unavailable,
            transcript_failures: batch.failures.len(),
            csv_path: report.csv_path,
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }
}
