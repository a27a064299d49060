use crate::domain::{ChannelRecord, Registry};
use crate::errors::TrackerResult;

#[cfg_attr(test, mockall::automock)]
pub trait ChannelRepository: Send + Sync {
    /// Load the full registry. A missing snapshot is an empty registry; an
    /// unreadable one is `CorruptStore`.
    fn load_all(&self) -> TrackerResult<Registry>;

    /// Insert a record under `alias` (case-folded), enforcing alias and
    /// channel-identity uniqueness, and persist the snapshot before
    /// returning the stored alias.
    fn register(
        &self,
        alias: &str,
        record: ChannelRecord,
        overwrite: bool,
    ) -> TrackerResult<String>;

    /// Advance `last_video_id` for `alias` and persist the snapshot.
    fn update_last_seen(&self, alias: &str, video_id: &str) -> TrackerResult<()>;

    /// Ordered `(alias, channel_name)` listing for external consumers.
    fn all_channels(&self) -> TrackerResult<Vec<(String, String)>>;
}
