use crate::domain::PollOutcome;
use crate::errors::TrackerResult;
use crate::poller::FeedPoller;
use crate::storage::ChannelRepository;

pub struct PollService<R: ChannelRepository> {
    repository: R,
    poller: FeedPoller,
}

impl<R: ChannelRepository> PollService<R> {
    pub fn new(repository: R, poller: FeedPoller) -> Self {
        Self { repository, poller }
    }

    /// Poll one alias, or every tracked channel, and commit the advanced
    /// `last_video_id` for each new video.
    ///
    /// Per-alias isolation extends to the commit step: a failed commit
    /// becomes that alias's outcome and the remaining aliases still commit.
    pub fn check(
        &self,
        selector: Option<&str>,
    ) -> TrackerResult<Vec<(String, TrackerResult<PollOutcome>)>> {
        let registry = self.repository.load_all()?;
        let mut results = self.poller.poll_many(&registry, selector);

        for (alias, result) in results.iter_mut() {
            let video_id = match result {
                Ok(PollOutcome::New(video)) => video.video_id.clone(),
                _ => continue,
            };

            if let Err(e) = self.repository.update_last_seen(alias, &video_id) {
                tracing::warn!(alias = %alias, error = %e, "failed to commit last seen video");
                *result = Err(e);
            }
        }

        Ok(results)
    }
}
