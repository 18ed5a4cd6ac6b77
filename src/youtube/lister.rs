use indicatif::ProgressBar;
use std::collections::HashMap;

use super::{DateRange, PlaylistEntry, VideoCatalog, VideoRecord};
use crate::HarvestError;

/// Maximum ids per details request
pub const DETAILS_BATCH_SIZE: usize = 50;

/// Pages through a channel's uploads and keeps the videos inside a date range
pub struct VideoLister<'a> {
    catalog: &'a dyn VideoCatalog,
    assume_descending: bool,
}

impl<'a> VideoLister<'a> {
    pub fn new(catalog: &'a dyn VideoCatalog, assume_descending: bool) -> Self {
        Self {
            catalog,
            assume_descending,
        }
    }

    /// List the uploads of `playlist_id` published inside `range`, with details
    pub async fn list_videos(
        &self,
        playlist_id: &str,
        range: &DateRange,
        progress: &ProgressBar,
    ) -> Result<Vec<VideoRecord>, HarvestError> {
        let entries = self.list_entries(playlist_id, range, progress).await?;
        self.enrich(entries, progress).await
    }

    /// Collect in-range playlist entries across all pages, in provider order
    pub async fn list_entries(
        &self,
        playlist_id: &str,
        range: &DateRange,
        progress: &ProgressBar,
    ) -> Result<Vec<PlaylistEntry>, HarvestError> {
        let mut matched = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_number = 0usize;
        let mut scanned = 0usize;

        loop {
            page_number += 1;
            let page = self
                .catalog
                .playlist_page(playlist_id, page_token.as_deref())
                .await
                .map_err(|e| {
                    HarvestError::Listing(format!("failed to fetch uploads page {}: {:#}", page_number, e))
                })?;

            scanned += page.entries.len();
            let mut dated = 0usize;
            let mut older = 0usize;

            for entry in page.entries {
                let Some(published_at) = entry.published_at else {
                    tracing::debug!("Skipping {} without publish date (private or deleted)", entry.video_id);
                    continue;
                };

                dated += 1;
                if range.contains(&published_at) {
                    matched.push(entry);
                } else if range.is_before(&published_at) {
                    older += 1;
                }
            }

            progress.set_message(format!(
                "Listing uploads... page {}, {} scanned, {} in range",
                page_number,
                scanned,
                matched.len()
            ));

            if self.assume_descending && dated > 0 && older == dated {
                tracing::debug!("Page {} is entirely older than {}, stopping", page_number, range.start());
                break;
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::info!(
            "Scanned {} uploads on {} page(s), {} published in {}",
            scanned,
            page_number,
            matched.len(),
            range
        );

        Ok(matched)
    }

    /// Attach titles, descriptions and statistics in batches
    pub async fn enrich(
        &self,
        entries: Vec<PlaylistEntry>,
        progress: &ProgressBar,
    ) -> Result<Vec<VideoRecord>, HarvestError> {
        let mut records = Vec::with_capacity(entries.len());

        for (batch_number, batch) in entries.chunks(DETAILS_BATCH_SIZE).enumerate() {
            progress.set_message(format!(
                "Fetching video details... {}/{}",
                batch_number * DETAILS_BATCH_SIZE + batch.len(),
                entries.len()
            ));

            let ids: Vec<String> = batch.iter().map(|entry| entry.video_id.clone()).collect();
            let mut details: HashMap<String, _> = self
                .catalog
                .video_details(&ids)
                .await
                .map_err(|e| HarvestError::Listing(format!("failed to fetch video details: {:#}", e)))?
                .into_iter()
                .map(|d| (d.video_id.clone(), d))
                .collect();

            for entry in batch {
                // Listing entries always carry a date at this point
                let Some(published_at) = entry.published_at else {
                    continue;
                };

                let record = match details.remove(&entry.video_id) {
                    Some(d) => VideoRecord {
                        id: entry.video_id.clone(),
                        title: d.title,
                        description: d.description,
                        published_at,
                        view_count: d.view_count,
                        like_count: d.like_count,
                        comment_count: d.comment_count,
                    },
                    None => {
                        tracing::warn!("No details returned for video {}", entry.video_id);
                        VideoRecord {
                            id: entry.video_id.clone(),
                            title: String::new(),
                            description: String::new(),
                            published_at,
                            view_count: None,
                            like_count: None,
                            comment_count: None,
                        }
                    }
                };
                records.push(record);
            }
        }

        Ok(records)
    }
}
