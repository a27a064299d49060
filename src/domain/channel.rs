use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alias-keyed channel registry, as persisted in the snapshot file.
/// Aliases are stored case-folded; iteration order is alias order.
pub type Registry = BTreeMap<String, ChannelRecord>;

/// One tracked YouTube channel.
///
/// Field names match the persisted snapshot format and must not change:
/// existing `channels.json` files depend on them, including `last_video_id`
/// serializing as an explicit `null` before the first poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel_id: String,
    pub rss_url: String,
    pub channel_name: String,
    pub last_video_id: Option<String>,
}

impl ChannelRecord {
    /// Build a fresh record for a resolved channel. The feed URL is derived
    /// from the channel ID; it is not independently settable.
    pub fn new(channel_id: String, channel_name: String) -> Self {
        let rss_url = feed_url(&channel_id);
        Self {
            channel_id,
            rss_url,
            channel_name,
            last_video_id: None,
        }
    }
}

/// YouTube's per-channel Atom feed URL.
pub fn feed_url(channel_id: &str) -> String {
    format!(
        "https://www.youtube.com/feeds/videos.xml?channel_id={}",
        channel_id
    )
}
