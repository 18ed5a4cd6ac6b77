use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

pub mod data_api;
pub mod lister;
pub mod resolver;

pub use data_api::DataApiClient;
pub use lister::VideoLister;
pub use resolver::ChannelResolver;

use crate::{HarvestError, Result};

/// A video published by the harvested channel
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    /// Provider video id
    pub id: String,

    /// Video title
    pub title: String,

    /// Video description
    pub description: String,

    /// Publish timestamp, as reported by the uploads playlist
    pub published_at: DateTime<Utc>,

    /// View count, if the channel exposes statistics
    pub view_count: Option<u64>,

    /// Like count, if the channel exposes it
    pub like_count: Option<u64>,

    /// Comment count, if comments are enabled
    pub comment_count: Option<u64>,
}

/// Inclusive window of publish dates, evaluated in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> std::result::Result<Self, HarvestError> {
        if start > end {
            return Err(HarvestError::Configuration(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a publish timestamp falls on a day inside the window
    pub fn contains(&self, published_at: &DateTime<Utc>) -> bool {
        let day = published_at.date_naive();
        self.start <= day && day <= self.end
    }

    /// Whether a publish timestamp is older than the whole window
    pub fn is_before(&self, published_at: &DateTime<Utc>) -> bool {
        published_at.date_naive() < self.start
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// One uploads playlist item
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub video_id: String,

    /// Missing for private or deleted uploads
    pub published_at: Option<DateTime<Utc>>,
}

/// One page of the uploads playlist
#[derive(Debug, Clone, Default)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
}

/// Title, description and statistics of a single video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
}

/// Directory, playlist and video lookups against a video provider
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Look a channel up by its exact `@handle`
    async fn channel_id_for_handle(&self, handle: &str) -> Result<Option<String>>;

    /// Free-text channel search, first hit only
    async fn search_channel_id(&self, query: &str) -> Result<Option<String>>;

    /// Playlist holding every upload of the channel
    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>>;

    /// Fetch one page of a playlist
    async fn playlist_page(&self, playlist_id: &str, page_token: Option<&str>) -> Result<PlaylistPage>;

    /// Fetch details for up to 50 video ids
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetails>>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}
