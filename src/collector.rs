//! Upload collection and ranking.
//!
//! Walks a channel's uploads playlist page by page, keeps the videos
//! published inside a date range, and ranks them by view count. The whole
//! filtered population is sorted before truncation so that ties keep their
//! playlist order.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::api::{VideoItem, YouTubeApi};
use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive range of calendar dates (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Validation(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse two `YYYY-MM-DD` strings into a range
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// True when the timestamp falls on any day of the range, both ends included
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let day = timestamp.date_naive();
        self.start <= day && day <= self.end
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("invalid date '{}', expected YYYY-MM-DD", value)))
}

/// One video of the result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    #[serde(skip)]
    pub video_id: String,
    pub title: String,
    pub view_count: u64,
    #[serde(serialize_with = "serialize_day")]
    pub published_at: DateTime<Utc>,
    pub url: String,
    pub thumbnail_url: String,
}

fn serialize_day<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(DATE_FORMAT))
}

impl VideoRecord {
    /// `YYYY-MM-DD` form of the publish timestamp
    pub fn published_day(&self) -> String {
        self.published_at.format(DATE_FORMAT).to_string()
    }

    fn from_item(item: VideoItem) -> Result<Self> {
        let published_at = DateTime::parse_from_rfc3339(&item.snippet.published_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                Error::Fetch(format!(
                    "malformed publishedAt '{}' for video {}: {}",
                    item.snippet.published_at, item.id, e
                ))
            })?;

        let view_count = match item.statistics.and_then(|s| s.view_count) {
            Some(count) => count.parse::<u64>().map_err(|_| {
                Error::Fetch(format!(
                    "malformed viewCount '{}' for video {}",
                    count, item.id
                ))
            })?,
            None => {
                warn!(video_id = %item.id, "no view count reported, using 0");
                0
            }
        };

        let thumbnail_url = item
            .snippet
            .thumbnails
            .smallest()
            .map(String::from)
            .unwrap_or_else(|| format!("https://i.ytimg.com/vi/{}/default.jpg", item.id));

        Ok(Self {
            url: format!("https://youtube.com/watch?v={}", item.id),
            title: item.snippet.title,
            view_count,
            published_at,
            thumbnail_url,
            video_id: item.id,
        })
    }
}

/// Look up the uploads playlist of a channel
pub async fn uploads_playlist(api: &dyn YouTubeApi, channel_id: &str) -> Result<String> {
    let channel = api
        .channels_by_id(channel_id)
        .await?
        .items
        .into_iter()
        .next()
        .ok_or_else(|| Error::ChannelNotFound(channel_id.to_string()))?;

    channel
        .content_details
        .and_then(|details| details.related_playlists.uploads)
        .ok_or_else(|| Error::Fetch(format!("channel {} has no uploads playlist", channel_id)))
}

/// Collect the `limit` most viewed videos of a channel within `range`
pub async fn collect(
    api: &dyn YouTubeApi,
    channel_id: &str,
    range: &DateRange,
    limit: usize,
) -> Result<Vec<VideoRecord>> {
    collect_with_cancel(api, channel_id, range, limit, &AtomicBool::new(false)).await
}

/// Like [`collect`], but checks `cancel` before each playlist page.
///
/// Cancellation discards everything gathered so far and yields
/// [`Error::Cancelled`].
pub async fn collect_with_cancel(
    api: &dyn YouTubeApi,
    channel_id: &str,
    range: &DateRange,
    limit: usize,
    cancel: &AtomicBool,
) -> Result<Vec<VideoRecord>> {
    let playlist_id = uploads_playlist(api, channel_id).await?;
    debug!(channel_id, playlist_id = %playlist_id, "found uploads playlist");

    let mut videos = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }

        let page = api.playlist_items(&playlist_id, page_token.as_deref()).await?;
        pages += 1;

        let video_ids: Vec<String> = page
            .items
            .into_iter()
            .map(|item| item.snippet.resource_id.video_id)
            .collect();

        if video_ids.is_empty() {
            break;
        }

        let batch = api.videos(&video_ids).await?;
        for item in batch.items {
            let record = VideoRecord::from_item(item)?;
            if range.contains(&record.published_at) {
                videos.push(record);
            }
        }

        debug!(page = pages, kept = videos.len(), "processed uploads page");

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(
        channel_id,
        pages,
        in_range = videos.len(),
        "finished collecting uploads"
    );

    Ok(rank(videos, limit))
}

/// Sort by view count, highest first, and keep the first `limit`.
///
/// The sort is stable: equal counts stay in the order they were fetched.
pub fn rank(mut videos: Vec<VideoRecord>, limit: usize) -> Vec<VideoRecord> {
    videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    videos.truncate(limit);
    videos
}
