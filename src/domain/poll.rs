/// Outcome of polling a single channel's feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The feed parsed but contains zero entries. A valid state, not an error.
    NoEntries,
    /// The latest entry matches the record's `last_video_id`.
    UpToDate,
    /// The latest entry differs from `last_video_id`. The caller is
    /// responsible for committing the new id via the registry store.
    New(NewVideo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub video_id: String,
    pub watch_url: String,
    pub published: Option<String>,
    pub channel_name: String,
}

impl NewVideo {
    pub fn new(video_id: String, channel_name: String, published: Option<String>) -> Self {
        let watch_url = watch_url(&video_id);
        Self {
            video_id,
            watch_url,
            published,
            channel_name,
        }
    }
}

/// YouTube watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
