//! Caller-facing pipeline: validate, resolve, collect.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tracing::info;

use crate::api::YouTubeApi;
use crate::collector::{collect_with_cancel, DateRange, VideoRecord};
use crate::error::{Error, Result};
use crate::resolver::resolve;

/// What the caller asks for, as typed by a user
#[derive(Debug, Clone)]
pub struct TopVideosRequest {
    pub channel: String,
    pub start_date: String,
    pub end_date: String,
    pub limit: usize,
}

/// Input that passed validation
#[derive(Debug, Clone)]
struct ValidRequest {
    channel: String,
    range: DateRange,
    limit: usize,
}

impl TopVideosRequest {
    fn validate(&self) -> Result<ValidRequest> {
        let channel = self.channel.trim();
        if channel.is_empty() {
            return Err(Error::Validation("channel URL is empty".to_string()));
        }
        if self.limit == 0 {
            return Err(Error::Validation(
                "number of videos must be at least 1".to_string(),
            ));
        }
        let range = DateRange::parse(&self.start_date, &self.end_date)?;

        Ok(ValidRequest {
            channel: channel.to_string(),
            range,
            limit: self.limit,
        })
    }
}

/// Videos returned for a request, with the range they were filtered by
#[derive(Debug, Clone)]
pub struct TopVideos {
    pub channel_id: String,
    pub range: DateRange,
    pub videos: Vec<VideoRecord>,
}

/// Find the most viewed videos of a channel within a date range.
///
/// Input is validated before any request is made.
pub async fn top_videos(api: &dyn YouTubeApi, request: &TopVideosRequest) -> Result<TopVideos> {
    top_videos_with_cancel(api, request, &AtomicBool::new(false)).await
}

async fn top_videos_with_cancel(
    api: &dyn YouTubeApi,
    request: &TopVideosRequest,
    cancel: &AtomicBool,
) -> Result<TopVideos> {
    let valid = request.validate()?;
    let channel_id = resolve(api, &valid.channel).await?;
    let videos = collect_with_cancel(api, &channel_id, &valid.range, valid.limit, cancel).await?;

    info!(
        channel_id = %channel_id,
        start = %valid.range.start(),
        end = %valid.range.end(),
        returned = videos.len(),
        "top videos ready"
    );
    Ok(TopVideos {
        channel_id,
        range: valid.range,
        videos,
    })
}

/// Result of a background fetch
#[derive(Debug)]
pub enum FetchOutcome {
    Success(TopVideos),
    Failure(Error),
}

impl From<Result<TopVideos>> for FetchOutcome {
    fn from(result: Result<TopVideos>) -> Self {
        match result {
            Ok(top) => FetchOutcome::Success(top),
            Err(e) => FetchOutcome::Failure(e),
        }
    }
}

/// Stops a background fetch at the next page boundary; cheap to clone
#[derive(Debug, Clone, Default)]
pub struct Canceller(Arc<AtomicBool>);

impl Canceller {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Handle to a fetch running on a background task
pub struct FetchHandle {
    outcome: oneshot::Receiver<FetchOutcome>,
    canceller: Canceller,
}

impl FetchHandle {
    /// A canceller that can outlive the handle, e.g. in a signal watcher
    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    /// Wait for the fetch to finish
    pub async fn outcome(self) -> FetchOutcome {
        self.outcome.await.unwrap_or_else(|_| {
            let reason = "background fetch task ended unexpectedly".to_string();
            FetchOutcome::Failure(Error::Fetch(reason))
        })
    }
}

/// Run [`top_videos`] on a tokio task; the outcome arrives through the handle.
pub fn spawn_top_videos(api: Arc<dyn YouTubeApi>, request: TopVideosRequest) -> FetchHandle {
    let (tx, rx) = oneshot::channel();
    let canceller = Canceller::default();
    let flag = canceller.0.clone();

    tokio::spawn(async move {
        let result = top_videos_with_cancel(api.as_ref(), &request, &flag).await;
        // The receiver may have been dropped; nobody is left to tell.
        let _ = tx.send(FetchOutcome::from(result));
    });

    FetchHandle {
        outcome: rx,
        canceller,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{video, FakeApi};

    fn request(channel: &str, start: &str, end: &str, limit: usize) -> TopVideosRequest {
        TopVideosRequest {
            channel: channel.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            limit,
        }
    }

    fn sample_api() -> FakeApi {
        let mut api = FakeApi::with_pages(vec![vec![
            video("a", "2024-01-10T12:00:00Z", 100),
            video("b", "2024-01-11T12:00:00Z", 500),
            video("c", "2024-01-12T12:00:00Z", 500),
        ]]);
        api.search_hits.insert("creator".to_string(), "UC123".to_string());
        api
    }

    #[tokio::test]
    async fn resolves_then_collects() {
        let api = sample_api();
        let top = top_videos(
            &api,
            &request("https://www.youtube.com/@creator", "2024-01-01", "2024-01-31", 2),
        )
        .await
        .unwrap();

        assert_eq!(top.channel_id, "UC123");
        assert_eq!(top.range, DateRange::parse("2024-01-01", "2024-01-31").unwrap());
        let ids: Vec<_> = top.videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn invalid_input_makes_no_requests() {
        let api = sample_api();
        let cases = [
            request("", "2024-01-01", "2024-01-31", 5),
            request("https://youtube.com/@creator", "2024-01-01", "2024-01-31", 0),
            request("https://youtube.com/@creator", "01/01/2024", "2024-01-31", 5),
            request("https://youtube.com/@creator", "2024-02-01", "2024-01-31", 5),
        ];

        for case in &cases {
            let err = top_videos(&api, case).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "unexpected {:?}", err);
        }
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn background_fetch_reports_success() {
        let api: Arc<dyn YouTubeApi> = Arc::new(sample_api());
        let handle = spawn_top_videos(
            api,
            request("https://youtube.com/channel/UC123", "2024-01-01", "2024-01-31", 3),
        );

        match handle.outcome().await {
            FetchOutcome::Success(top) => assert_eq!(top.videos.len(), 3),
            FetchOutcome::Failure(e) => panic!("unexpected failure: {}", e),
        }
    }

    #[tokio::test]
    async fn cancelled_fetch_returns_no_videos() {
        let api: Arc<dyn YouTubeApi> = Arc::new(sample_api());
        let handle = spawn_top_videos(
            api,
            request("https://youtube.com/channel/UC123", "2024-01-01", "2024-01-31", 3),
        );
        // Single-threaded test runtime: the task has not been polled yet.
        let canceller = handle.canceller();
        canceller.cancel();
        assert!(canceller.is_cancelled());

        assert!(matches!(
            handle.outcome().await,
            FetchOutcome::Failure(Error::Cancelled)
        ));
    }

    #[tokio::test]
    async fn background_fetch_reports_failure() {
        let api: Arc<dyn YouTubeApi> = Arc::new(sample_api());
        let handle = spawn_top_videos(
            api,
            request("https://youtube.com/@unknown", "2024-01-01", "2024-01-31", 3),
        );

        assert!(matches!(
            handle.outcome().await,
            FetchOutcome::Failure(Error::Resolution(_))
        ));
    }
}
