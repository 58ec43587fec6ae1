//! Scripted in-memory stand-in for the Data API, shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::api::{
    ChannelContentDetails, ChannelItem, ChannelListResponse, PlaylistItem,
    PlaylistItemListResponse, PlaylistItemSnippet, RelatedPlaylists, ResourceId, SearchListResponse,
    SearchResult, SearchSnippet, Thumbnail, Thumbnails, VideoItem, VideoListResponse, VideoSnippet,
    VideoStatistics, YouTubeApi,
};
use crate::error::{Error, Result};

pub struct FakeVideo {
    pub id: &'static str,
    pub published_at: &'static str,
    /// Sent verbatim as `statistics.viewCount`
    pub view_count: Option<String>,
    pub has_thumbnail: bool,
}

pub fn video(id: &'static str, published_at: &'static str, view_count: u64) -> FakeVideo {
    FakeVideo {
        id,
        published_at,
        view_count: Some(view_count.to_string()),
        has_thumbnail: true,
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub usernames: HashMap<String, String>,
    pub search_hits: HashMap<String, String>,
    pub uploads: HashMap<String, String>,
    pub pages: Vec<Vec<FakeVideo>>,
    /// Zero-based page whose statistics call fails
    pub failing_videos_page: Option<usize>,
    pub channel_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub playlist_calls: AtomicUsize,
    pub videos_calls: AtomicUsize,
}

impl FakeApi {
    /// Channel `UC123` with uploads playlist `UU123` serving `pages`
    pub fn with_pages(pages: Vec<Vec<FakeVideo>>) -> Self {
        let mut api = Self {
            pages,
            ..Default::default()
        };
        api.uploads.insert("UC123".to_string(), "UU123".to_string());
        api
    }

    pub fn total_calls(&self) -> usize {
        self.channel_calls.load(Ordering::SeqCst)
            + self.search_calls.load(Ordering::SeqCst)
            + self.playlist_calls.load(Ordering::SeqCst)
            + self.videos_calls.load(Ordering::SeqCst)
    }

    fn find_video(&self, id: &str) -> Option<(usize, &FakeVideo)> {
        self.pages.iter().enumerate().find_map(|(page, videos)| {
            videos.iter().find(|v| v.id == id).map(|v| (page, v))
        })
    }
}

#[async_trait]
impl YouTubeApi for FakeApi {
    async fn channels_by_username(&self, username: &str) -> Result<ChannelListResponse> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        let items = self
            .usernames
            .get(username)
            .map(|id| {
                vec![ChannelItem {
                    id: id.clone(),
                    content_details: None,
                }]
            })
            .unwrap_or_default();
        Ok(ChannelListResponse { items })
    }

    async fn channels_by_id(&self, channel_id: &str) -> Result<ChannelListResponse> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        let items = self
            .uploads
            .get(channel_id)
            .map(|uploads| {
                vec![ChannelItem {
                    id: channel_id.to_string(),
                    content_details: Some(ChannelContentDetails {
                        related_playlists: RelatedPlaylists {
                            uploads: Some(uploads.clone()),
                        },
                    }),
                }]
            })
            .unwrap_or_default();
        Ok(ChannelListResponse { items })
    }

    async fn search_channels(&self, query: &str, _max_results: u32) -> Result<SearchListResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let items = self
            .search_hits
            .get(query)
            .map(|id| {
                vec![SearchResult {
                    snippet: SearchSnippet {
                        channel_id: id.clone(),
                    },
                }]
            })
            .unwrap_or_default();
        Ok(SearchListResponse { items })
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse> {
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        if !self.uploads.values().any(|p| p == playlist_id) {
            return Err(Error::Fetch(format!("unknown playlist {}", playlist_id)));
        }

        let page = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| Error::Fetch(format!("bad page token {}", token)))?,
        };

        let items = self
            .pages
            .get(page)
            .map(|videos| {
                videos
                    .iter()
                    .map(|v| PlaylistItem {
                        snippet: PlaylistItemSnippet {
                            resource_id: ResourceId {
                                video_id: v.id.to_string(),
                            },
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();

        let next_page_token = (page + 1 < self.pages.len()).then(|| format!("page-{}", page + 1));

        Ok(PlaylistItemListResponse {
            items,
            next_page_token,
        })
    }

    async fn videos(&self, video_ids: &[String]) -> Result<VideoListResponse> {
        self.videos_calls.fetch_add(1, Ordering::SeqCst);

        let mut items = Vec::new();
        for id in video_ids {
            let Some((page, v)) = self.find_video(id) else {
                continue;
            };
            if self.failing_videos_page == Some(page) {
                return Err(Error::Fetch("videos request failed (403): quotaExceeded".to_string()));
            }
            items.push(VideoItem {
                id: v.id.to_string(),
                snippet: VideoSnippet {
                    title: format!("Video {}", v.id),
                    published_at: v.published_at.to_string(),
                    thumbnails: Thumbnails {
                        default: v.has_thumbnail.then(|| Thumbnail {
                            url: format!("https://i.ytimg.com/vi/{}/default.jpg", v.id),
                        }),
                        ..Default::default()
                    },
                },
                statistics: Some(VideoStatistics {
                    view_count: v.view_count.clone(),
                }),
            });
        }

        Ok(VideoListResponse { items })
    }
}
