use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use reqwest::blocking::Client;

use crate::domain::{ChannelRecord, NewVideo, PollOutcome, Registry};
use crate::errors::{TrackerError, TrackerResult};

const HTTP_TIMEOUT_SECS: u64 = 10;

/// Prefix YouTube puts on Atom entry ids (`yt:video:VIDEOID`). The suffix is
/// the channel-native video identifier.
const VIDEO_ID_PREFIX: &str = "yt:video:";

/// Fetches channel feeds and evaluates them against the tracked
/// `last_video_id`. Polling never persists anything; committing an advance is
/// the caller's job.
pub struct FeedPoller {
    client: Client,
}

impl FeedPoller {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Poll a single channel. Pure query: repeated calls without a committed
    /// update report the same outcome.
    pub fn poll(&self, record: &ChannelRecord) -> TrackerResult<PollOutcome> {
        let feed = self.fetch_and_parse(&record.rss_url)?;
        Ok(evaluate(&feed, record))
    }

    /// Poll one selected alias, or every alias in registry order.
    ///
    /// Each result is computed independently; an unreachable feed becomes that
    /// alias's outcome and never aborts the remaining aliases.
    pub fn poll_many(
        &self,
        registry: &Registry,
        selector: Option<&str>,
    ) -> Vec<(String, TrackerResult<PollOutcome>)> {
        match selector {
            Some(alias) => {
                let alias = alias.to_lowercase();
                let result = match registry.get(&alias) {
                    Some(record) => self.poll(record),
                    None => Err(TrackerError::UnknownAlias(alias.clone())),
                };
                vec![(alias, result)]
            }
            None => registry
                .iter()
                .map(|(alias, record)| {
                    let result = self.poll(record);
                    if let Err(ref e) = result {
                        tracing::warn!(alias = %alias, error = %e, "poll failed");
                    }
                    (alias.clone(), result)
                })
                .collect(),
        }
    }

    fn fetch_and_parse(&self, url: &str) -> TrackerResult<Feed> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        parse_bytes(&bytes[..])
    }
}

impl Default for FeedPoller {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bytes(bytes: &[u8]) -> TrackerResult<Feed> {
    parser::parse(bytes).map_err(|e| TrackerError::FeedParse(e.to_string()))
}

/// Compare the feed's most recent entry against the record's last seen id.
fn evaluate(feed: &Feed, record: &ChannelRecord) -> PollOutcome {
    let latest = match feed.entries.first() {
        Some(entry) => entry,
        None => return PollOutcome::NoEntries,
    };

    let video_id = video_id_of(latest);

    // A never-polled record (last_video_id null) compares unequal to any real
    // id, so the first poll reports whatever is currently latest as new.
    if record.last_video_id.as_deref() == Some(video_id.as_str()) {
        return PollOutcome::UpToDate;
    }

    let published = latest
        .published
        .or(latest.updated)
        .map(|dt| dt.format("%Y-%m-%d").to_string());

    PollOutcome::New(NewVideo::new(
        video_id,
        record.channel_name.clone(),
        published,
    ))
}

/// Entry identity: the native YouTube video id when the entry carries one,
/// the generic entry id otherwise. Both are equally authoritative.
fn video_id_of(entry: &Entry) -> String {
    match entry.id.strip_prefix(VIDEO_ID_PREFIX) {
        Some(native) => native.to_string(),
        None => entry.id.clone(),
    }
}
