use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{PlaylistEntry, PlaylistPage, VideoCatalog, VideoDetails};
use crate::config::YoutubeConfig;
use crate::Result;

/// YouTube Data API v3 client
pub struct DataApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemDetails {
    video_id: String,
    video_published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    published_at: DateTime<Utc>,
}

/// Counts arrive as decimal strings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn parse_count(value: Option<&str>) -> Option<u64> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Pull the human readable message out of a Data API error body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

impl DataApiClient {
    pub fn new(config: &YoutubeConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|_| anyhow::anyhow!("Invalid API base URL: {}", config.api_base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            page_size: config.page_size,
        })
    }

    /// GET an endpoint and decode the JSON body. The key is never logged.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut url = self.base_url.join(endpoint)?;
        tracing::debug!("GET {} {:?}", url, params);

        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("key", &self.api_key);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Request to {} failed: {}", endpoint, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "YouTube Data API {} returned HTTP {}: {}",
                endpoint,
                status,
                api_error_message(&body)
            );
        }

        let body = response.json::<T>().await.map_err(|e| {
            anyhow::anyhow!("Unexpected {} response: {}", endpoint, e.without_url())
        })?;

        Ok(body)
    }
}

#[async_trait]
impl VideoCatalog for DataApiClient {
    async fn channel_id_for_handle(&self, handle: &str) -> Result<Option<String>> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "id"), ("forHandle", handle)])
            .await?;

        Ok(response.items.into_iter().next().map(|item| item.id))
    }

    async fn search_channel_id(&self, query: &str) -> Result<Option<String>> {
        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", query),
                    ("type", "channel"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet.channel_id))
    }

    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.content_details)
            .and_then(|details| details.related_playlists.uploads))
    }

    async fn playlist_page(&self, playlist_id: &str, page_token: Option<&str>) -> Result<PlaylistPage> {
        let page_size = self.page_size.to_string();
        let mut params = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItem> = self.get_json("playlistItems", &params).await?;

        let entries = response
            .items
            .into_iter()
            .map(|item| PlaylistEntry {
                video_id: item.content_details.video_id,
                published_at: item.content_details.video_published_at,
            })
            .collect();

        Ok(PlaylistPage {
            entries,
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoDetails>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = video_ids.join(",");
        let response: ListResponse<VideoItem> = self
            .get_json(
                "videos",
                &[
                    ("part", "snippet,statistics"),
                    ("id", ids.as_str()),
                    ("maxResults", "50"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| VideoDetails {
                video_id: item.id,
                title: item.snippet.title,
                description: item.snippet.description,
                published_at: item.snippet.published_at,
                view_count: parse_count(item.statistics.view_count.as_deref()),
                like_count: parse_count(item.statistics.like_count.as_deref()),
                comment_count: parse_count(item.statistics.comment_count.as_deref()),
            })
            .collect())
    }

    fn provider_name(&self) -> &'static str {
        "YouTube Data API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DataApiClient {
        let config = YoutubeConfig {
            api_key: "test-key".to_string(),
            api_base_url: format!("{}/youtube/v3/", server.uri()),
            page_size: 50,
            request_timeout_secs: 5,
        };
        DataApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_channel_id_for_handle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/channels"))
            .and(query_param("forHandle", "@KamFIT24"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "UC123" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let id = client.channel_id_for_handle("@KamFIT24").await.unwrap();
        assert_eq!(id.as_deref(), Some("UC123"));
    }

    #[tokio::test]
    async fn test_unknown_handle_has_no_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "kind": "youtube#channelListResponse" })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.channel_id_for_handle("@nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_channel_id_takes_first_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/search"))
            .and(query_param("type", "channel"))
            .and(query_param("q", "KamFIT24"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "snippet": { "channelId": "UCfirst" } },
                    { "snippet": { "channelId": "UCsecond" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let id = client.search_channel_id("KamFIT24").await.unwrap();
        assert_eq!(id.as_deref(), Some("UCfirst"));
    }

    #[tokio::test]
    async fn test_uploads_playlist_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/channels"))
            .and(query_param("id", "UC123"))
            .and(query_param("part", "contentDetails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "id": "UC123",
                    "contentDetails": { "relatedPlaylists": { "uploads": "UU123" } }
                }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(
            client.uploads_playlist_id("UC123").await.unwrap().as_deref(),
            Some("UU123")
        );
    }

    #[tokio::test]
    async fn test_playlist_page_follows_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlistItems"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "nextPageToken": "CDIQAA",
                "items": [
                    { "contentDetails": { "videoId": "v1", "videoPublishedAt": "2025-06-30T17:00:00Z" } },
                    { "contentDetails": { "videoId": "gone" } }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlistItems"))
            .and(query_param("pageToken", "CDIQAA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "contentDetails": { "videoId": "v2", "videoPublishedAt": "2025-03-31T08:00:00Z" } }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let first = client.playlist_page("UU123", None).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.entries[0].video_id, "v1");
        assert!(first.entries[1].published_at.is_none());
        assert_eq!(first.next_page_token.as_deref(), Some("CDIQAA"));

        let second = client.playlist_page("UU123", Some("CDIQAA")).await.unwrap();
        assert_eq!(second.entries[0].video_id, "v2");
        assert!(second.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_video_details_parses_statistics() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/videos"))
            .and(query_param("id", "v1,v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {
                        "id": "v1",
                        "snippet": { "title": "Trénink", "description": "Popis", "publishedAt": "2025-06-30T17:00:00Z" },
                        "statistics": { "viewCount": "1520", "likeCount": "33", "commentCount": "4" }
                    },
                    {
                        "id": "v2",
                        "snippet": { "title": "Bez statistik", "publishedAt": "2025-05-01T09:00:00Z" }
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let details = client
            .video_details(&["v1".to_string(), "v2".to_string()])
            .await
            .unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].title, "Trénink");
        assert_eq!(details[0].view_count, Some(1520));
        assert_eq!(details[0].comment_count, Some(4));
        assert_eq!(details[1].description, "");
        assert_eq!(details[1].view_count, None);
    }

    #[tokio::test]
    async fn test_video_details_skips_request_for_empty_batch() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        assert!(client.video_details(&[]).await.unwrap().is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_error_surfaces_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/youtube/v3/playlistItems"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "The request cannot be completed because you have exceeded your quota." }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.playlist_page("UU123", None).await.unwrap_err();
        let message = err.to_string();

        assert!(message.contains("403"));
        assert!(message.contains("exceeded your quota"));
        assert!(!message.contains("test-key"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("42")), Some(42));
        assert_eq!(parse_count(Some("n/a")), None);
        assert_eq!(parse_count(None), None);
    }
}
