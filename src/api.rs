//! YouTube Data API v3 client.
//!
//! The [`YouTubeApi`] trait covers the four list calls the resolver and the
//! collector need. [`DataApiClient`] implements it over HTTP; tests swap in
//! scripted fakes.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Largest page size the Data API accepts for list calls
pub const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    pub channel_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// View counts arrive as decimal strings and are absent when the owner hides them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
    pub standard: Option<Thumbnail>,
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// URL of the smallest thumbnail present
    pub fn smallest(&self) -> Option<&str> {
        [
            &self.default,
            &self.medium,
            &self.high,
            &self.standard,
            &self.maxres,
        ]
        .into_iter()
        .flatten()
        .map(|t| t.url.as_str())
        .next()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: u16,
    message: String,
}

/// The subset of the Data API used to resolve channels and collect uploads
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    /// `channels.list` by legacy username (part=id)
    async fn channels_by_username(&self, username: &str) -> Result<ChannelListResponse>;

    /// `channels.list` by channel ID (part=contentDetails)
    async fn channels_by_id(&self, channel_id: &str) -> Result<ChannelListResponse>;

    /// `search.list` restricted to channels
    async fn search_channels(&self, query: &str, max_results: u32) -> Result<SearchListResponse>;

    /// One page of `playlistItems.list`
    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse>;

    /// `videos.list` for a batch of IDs (part=statistics,snippet)
    async fn videos(&self, video_ids: &[String]) -> Result<VideoListResponse>;
}

/// HTTP client for the YouTube Data API
pub struct DataApiClient {
    client: Client,
    config: ApiConfig,
}

impl DataApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Issue a GET against `endpoint` and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        debug!(endpoint, ?params, "calling Data API");

        let response = self
            .client
            .get(format!("{}/{}", self.config.base_url, endpoint))
            .query(&[("key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorBody>(&text) {
                Ok(body) => format!("{} (code {})", body.error.message, body.error.code),
                Err(_) => text,
            };
            return Err(Error::Fetch(format!(
                "{} request failed ({}): {}",
                endpoint, status, message
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Fetch(format!("malformed {} response: {}", endpoint, e)))
    }
}

#[async_trait]
impl YouTubeApi for DataApiClient {
    async fn channels_by_username(&self, username: &str) -> Result<ChannelListResponse> {
        self.get("channels", &[("part", "id"), ("forUsername", username)])
            .await
    }

    async fn channels_by_id(&self, channel_id: &str) -> Result<ChannelListResponse> {
        self.get("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await
    }

    async fn search_channels(&self, query: &str, max_results: u32) -> Result<SearchListResponse> {
        let max_results = max_results.to_string();
        self.get(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "channel"),
                ("maxResults", &max_results),
            ],
        )
        .await
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse> {
        let max_results = MAX_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        self.get("playlistItems", &params).await
    }

    async fn videos(&self, video_ids: &[String]) -> Result<VideoListResponse> {
        let ids = video_ids.join(",");
        self.get("videos", &[("part", "statistics,snippet"), ("id", &ids)])
            .await
    }
}
