use std::sync::Arc;

use crate::api::{DataApiClient, YouTubeApi};
use crate::collector::VideoRecord;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::fetcher::{spawn_top_videos, FetchOutcome, TopVideosRequest};
use crate::report::{format_view_count, header, json_report, text_report};

pub struct TopArgs {
    pub channel: String,
    pub start: String,
    pub end: String,
    pub limit: usize,
    pub json: bool,
    pub plain: bool,
}

pub async fn run(args: TopArgs) -> Result<()> {
    let client: Arc<dyn YouTubeApi> = Arc::new(DataApiClient::new(ApiConfig::from_env()?)?);

    let request = TopVideosRequest {
        channel: args.channel,
        start_date: args.start,
        end_date: args.end,
        limit: args.limit,
    };

    eprintln!("Fetching videos from channel... (Ctrl-C to cancel)");
    let handle = spawn_top_videos(client, request.clone());

    // Ctrl-C stops the fetch after the page in flight
    let canceller = handle.canceller();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling...");
            canceller.cancel();
        }
    });

    let outcome = handle.outcome().await;
    watcher.abort();

    let top = match outcome {
        FetchOutcome::Success(top) => top,
        FetchOutcome::Failure(e) => return Err(e),
    };

    if args.json {
        println!("{}", json_report(&top.videos)?);
        return Ok(());
    }

    if args.plain {
        print!("{}", text_report(&top.videos, &top.range));
        return Ok(());
    }

    if top.videos.is_empty() {
        println!(
            "No videos published between {} and {} for channel: {}",
            top.range.start(),
            top.range.end(),
            request.channel
        );
        return Ok(());
    }

    println!("{}\n", header(top.videos.len(), &top.range));

    for (i, video) in top.videos.iter().enumerate() {
        print_video_entry(i + 1, video);
    }

    Ok(())
}

fn print_video_entry(index: usize, video: &VideoRecord) {
    println!("{}. {}", index, video.title);
    println!(
        "   {} views | {}",
        format_view_count(video.view_count),
        video.published_day()
    );

    // URL for easy copying
    println!("   {}", video.url);
    println!("   Thumbnail: {}", video.thumbnail_url);
    println!();
}
