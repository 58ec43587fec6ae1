pub mod api;
pub mod collector;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use api::{DataApiClient, YouTubeApi};
pub use collector::{DateRange, VideoRecord};
pub use error::{Error, Result};
pub use fetcher::{
    spawn_top_videos, top_videos, Canceller, FetchHandle, FetchOutcome, TopVideos,
    TopVideosRequest,
};
