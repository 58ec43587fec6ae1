//! Channel URL resolution.
//!
//! Direct `/channel/<id>` URLs resolve locally. Legacy usernames go through
//! `channels.list?forUsername`, while custom `/c/` names and `@handles` fall
//! back to a best-effort channel search: the top hit is taken as the answer.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::api::YouTubeApi;
use crate::error::{Error, Result};

/// A channel URL, classified by shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelReference {
    /// `youtube.com/channel/<id>`
    Id(String),
    /// `youtube.com/user/<username>`
    Username(String),
    /// `youtube.com/c/<name>`
    CustomName(String),
    /// `youtube.com/@<handle>`
    Handle(String),
}

type Constructor = fn(String) -> ChannelReference;

/// Checked in order; the first match wins.
static PATTERNS: LazyLock<Vec<(Regex, Constructor)>> = LazyLock::new(|| {
    let table: [(&str, Constructor); 4] = [
        (r"youtube\.com/channel/([\w-]+)", ChannelReference::Id),
        (r"youtube\.com/user/([\w-]+)", ChannelReference::Username),
        (r"youtube\.com/c/([\w-]+)", ChannelReference::CustomName),
        (r"youtube\.com/@([\w-]+)", ChannelReference::Handle),
    ];
    table
        .into_iter()
        .map(|(pattern, make)| (Regex::new(pattern).expect("valid channel pattern"), make))
        .collect()
});

impl ChannelReference {
    /// Classify a channel URL, or fail if no known shape matches
    pub fn parse(reference: &str) -> Result<Self> {
        PATTERNS
            .iter()
            .find_map(|(re, make)| re.captures(reference).map(|caps| make(caps[1].to_string())))
            .ok_or_else(|| Error::Resolution("unrecognized channel reference format".to_string()))
    }
}

/// Resolve a channel URL to its channel ID
pub async fn resolve(api: &dyn YouTubeApi, reference: &str) -> Result<String> {
    let parsed = ChannelReference::parse(reference)?;
    debug!(?parsed, "parsed channel reference");

    let channel_id = match parsed {
        ChannelReference::Id(id) => id,
        ChannelReference::Username(username) => api
            .channels_by_username(&username)
            .await?
            .items
            .into_iter()
            .next()
            .map(|channel| channel.id)
            .ok_or_else(channel_not_found)?,
        ChannelReference::CustomName(query) | ChannelReference::Handle(query) => api
            .search_channels(&query, 1)
            .await?
            .items
            .into_iter()
            .next()
            .map(|hit| hit.snippet.channel_id)
            .ok_or_else(channel_not_found)?,
    };

    info!(reference, channel_id = %channel_id, "resolved channel");
    Ok(channel_id)
}

fn channel_not_found() -> Error {
    Error::Resolution("channel not found".to_string())
}
