use crate::domain::PollOutcome;
use crate::errors::{TrackerError, TrackerResult};

/// Render poll results as the user-facing digest: one block per alias in
/// input order, blank-line separated. Failures are rendered like any other
/// outcome; this function never fails.
pub fn render(results: &[(String, TrackerResult<PollOutcome>)]) -> String {
    results
        .iter()
        .map(|(alias, result)| render_line(alias, result))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_line(alias: &str, result: &TrackerResult<PollOutcome>) -> String {
    match result {
        Ok(PollOutcome::NoEntries) => format!("No videos found for alias '{}'.", alias),
        Ok(PollOutcome::UpToDate) => format!("No new videos for '{}'.", alias),
        Ok(PollOutcome::New(video)) => format!(
            "🎥 New video from {}:\n{}",
            video.channel_name, video.watch_url
        ),
        Err(TrackerError::UnknownAlias(alias)) => {
            format!("No channel registered under alias '{}'.", alias)
        }
        Err(e) => format!("Could not check '{}': {}", alias, e),
    }
}
