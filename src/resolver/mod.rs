use feed_rs::parser;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::feed_url;
use crate::errors::{TrackerError, TrackerResult};

const HTTP_TIMEOUT_SECS: u64 = 10;

/// Resolves a user-supplied channel reference (URL or handle) to the stable
/// `UC…` channel identifier, and looks up the channel's display name.
pub struct ChannelResolver {
    client: Client,
}

impl ChannelResolver {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .user_agent("Mozilla/5.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Resolve a channel reference to its channel ID.
    ///
    /// References that already embed `/channel/UC…` resolve without a network
    /// round trip. Anything else (handles, /c/ and /user/ pages, watch links)
    /// is fetched and scanned for the channel ID.
    pub fn resolve(&self, reference: &str) -> TrackerResult<String> {
        let channel_regex = Regex::new(r"youtube\.com/channel/(UC[\w-]{22})").unwrap();
        if let Some(caps) = channel_regex.captures(reference) {
            return Ok(caps[1].to_string());
        }

        let url = normalize_reference(reference)?;
        self.resolve_from_page(url.as_str())
    }

    /// Fetch a YouTube page and extract the channel ID from meta tags or the
    /// page source.
    fn resolve_from_page(&self, url: &str) -> TrackerResult<String> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let html = response.text()?;

        if let Some(channel_id) = scan_for_channel_id(&html) {
            return Ok(channel_id);
        }

        Err(TrackerError::ChannelIdNotFound(url.to_string()))
    }

    /// Fetch the channel's feed and return its title, falling back to the raw
    /// channel ID when the feed carries no title. Never empty, so registration
    /// can always proceed once an identity is known.
    pub fn display_name(&self, channel_id: &str) -> TrackerResult<String> {
        let response = self
            .client
            .get(feed_url(channel_id))
            .send()?
            .error_for_status()?;
        let bytes = response.bytes()?;

        let feed =
            parser::parse(&bytes[..]).map_err(|e| TrackerError::FeedParse(e.to_string()))?;

        Ok(title_of(&feed).unwrap_or_else(|| channel_id.to_string()))
    }
}

impl Default for ChannelResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan page HTML for the channel ID: meta tag, canonical link, then raw
/// source patterns.
fn scan_for_channel_id(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let meta_selector = Selector::parse("meta[itemprop='channelId']").unwrap();
    if let Some(element) = document.select(&meta_selector).next() {
        if let Some(channel_id) = element.value().attr("content") {
            return Some(channel_id.to_string());
        }
    }

    let channel_regex = Regex::new(r"youtube\.com/channel/(UC[\w-]{22})").unwrap();
    let link_selector = Selector::parse("link[rel='canonical']").unwrap();
    if let Some(element) = document.select(&link_selector).next() {
        if let Some(href) = element.value().attr("href") {
            if let Some(caps) = channel_regex.captures(href) {
                return Some(caps[1].to_string());
            }
        }
    }

    let body_regex = Regex::new(r#""channelId":"(UC[\w-]{22})""#).unwrap();
    if let Some(caps) = body_regex.captures(html) {
        return Some(caps[1].to_string());
    }

    let alt_regex = Regex::new(r"channel/(UC[\w-]{22})").unwrap();
    alt_regex.captures(html).map(|caps| caps[1].to_string())
}

/// Parse a reference the way chat users type it, allowing an implicit
/// `https://` prefix.
fn normalize_reference(reference: &str) -> TrackerResult<Url> {
    match Url::parse(reference) {
        Ok(url) => Ok(url),
        Err(e) => Url::parse(&format!("https://{}", reference))
            .map_err(|_| TrackerError::InvalidReference(format!("{}: {}", reference, e))),
    }
}

fn title_of(feed: &feed_rs::model::Feed) -> Option<String> {
    feed.title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_channel_url_without_fetching() {
        let resolver = ChannelResolver::new();

        let id = resolver
            .resolve("https://www.youtube.com/channel/UCX8pU3aeRkIH1y3V1kHqlFw")
            .unwrap();
        assert_eq!(id, "UCX8pU3aeRkIH1y3V1kHqlFw");
    }

    #[test]
    fn test_resolve_channel_url_with_trailing_path() {
        let resolver = ChannelResolver::new();

        let id = resolver
            .resolve("https://www.youtube.com/channel/UCX8pU3aeRkIH1y3V1kHqlFw/videos")
            .unwrap();
        assert_eq!(id, "UCX8pU3aeRkIH1y3V1kHqlFw");
    }

    #[test]
    fn test_normalize_adds_implicit_scheme() {
        let url = normalize_reference("www.youtube.com/@SomeChannel").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("www.youtube.com"));
    }

    #[test]
    fn test_normalize_keeps_explicit_scheme() {
        let url = normalize_reference("https://youtube.com/@SomeChannel").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_scan_finds_meta_tag() {
        let html = r#"<html><head>
            <meta itemprop="channelId" content="UCX8pU3aeRkIH1y3V1kHqlFw">
        </head><body></body></html>"#;

        assert_eq!(
            scan_for_channel_id(html).as_deref(),
            Some("UCX8pU3aeRkIH1y3V1kHqlFw")
        );
    }

    #[test]
    fn test_scan_finds_canonical_link() {
        let html = r#"<html><head>
            <link rel="canonical" href="https://www.youtube.com/channel/UCX8pU3aeRkIH1y3V1kHqlFw">
        </head><body></body></html>"#;

        assert_eq!(
            scan_for_channel_id(html).as_deref(),
            Some("UCX8pU3aeRkIH1y3V1kHqlFw")
        );
    }

    #[test]
    fn test_scan_finds_embedded_json_pattern() {
        let html = r#"<html><body><script>var ytcfg = {"channelId":"UCX8pU3aeRkIH1y3V1kHqlFw"};</script></body></html>"#;

        assert_eq!(
            scan_for_channel_id(html).as_deref(),
            Some("UCX8pU3aeRkIH1y3V1kHqlFw")
        );
    }

    #[test]
    fn test_scan_misses_when_no_id_present() {
        let html = "<html><body><p>not a channel page</p></body></html>";
        assert!(scan_for_channel_id(html).is_none());
    }

    #[test]
    fn test_title_of_trims_feed_title() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title> Some Channel </title>
  <id>yt:channel:X8pU3aeRkIH1y3V1kHqlFw</id>
</feed>"#;

        let feed = parser::parse(&xml[..]).unwrap();
        assert_eq!(title_of(&feed).as_deref(), Some("Some Channel"));
    }
}
