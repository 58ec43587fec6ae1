use crate::collector::{DateRange, VideoRecord};
use crate::error::Result;

/// Format a count with comma thousands separators (1234567 -> "1,234,567")
pub fn format_view_count(views: u64) -> String {
    let digits = views.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn header(count: usize, range: &DateRange) -> String {
    format!(
        "Top {} most viewed videos between {} and {}:",
        count,
        range.start(),
        range.end()
    )
}

/// Plain-text report, one numbered block per video
pub fn text_report(videos: &[VideoRecord], range: &DateRange) -> String {
    let mut text = format!("{}\n\n", header(videos.len(), range));

    for (i, video) in videos.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, video.title));
        text.push_str(&format!("   Views: {}\n", format_view_count(video.view_count)));
        text.push_str(&format!("   Published: {}\n", video.published_day()));
        text.push_str(&format!("   URL: {}\n\n", video.url));
    }

    text
}

pub fn json_report(videos: &[VideoRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(videos)?)
}
