pub mod channel;
pub mod poll;

pub use channel::{feed_url, ChannelRecord, Registry};
pub use poll::{watch_url, NewVideo, PollOutcome};
