pub mod session;

use botapi::{BotApi, BotCommand};

use crate::errors::TrackerResult;
use crate::report;
use crate::services::{PollService, RegistrationService};
use crate::storage::ChannelRepository;

use session::SessionMap;

/// Delay before retrying after a failed long poll.
const RETRY_DELAY_SECS: u64 = 5;

/// A chat command addressed to the bot.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Help,
    About,
    Add { args: Vec<&'a str> },
    Fetch { alias: Option<&'a str> },
    CollectLinks,
    Done,
    Unknown(&'a str),
}

/// Parse a message as a bot command. Returns None for plain text.
/// Accepts the `/command@BotName` form Telegram uses in group chats.
pub fn parse_command(text: &str) -> Option<Command<'_>> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let mut parts = text.split_whitespace();
    let head = parts.next()?;
    let name = head[1..].split('@').next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    Some(match name {
        "start" => Command::Start,
        "help" => Command::Help,
        "about" => Command::About,
        "add_to_youtube" => Command::Add { args },
        "fetch_from_youtube" => Command::Fetch {
            alias: args.first().copied(),
        },
        "collect_links" => Command::CollectLinks,
        "done" => Command::Done,
        other => Command::Unknown(other),
    })
}

pub struct Bot<R: ChannelRepository> {
    api: BotApi,
    registration: RegistrationService<R>,
    polling: PollService<R>,
    sessions: SessionMap,
}

impl<R: ChannelRepository> Bot<R> {
    pub fn new(api: BotApi, registration: RegistrationService<R>, polling: PollService<R>) -> Self {
        Self {
            api,
            registration,
            polling,
            sessions: SessionMap::new(),
        }
    }

    /// Long-poll for updates and answer them, indefinitely.
    pub fn run(&mut self) -> TrackerResult<()> {
        self.register_commands()?;
        tracing::info!("bot started");

        let mut offset = None;
        loop {
            let updates = match self.api.get_updates(offset) {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed");
                    std::thread::sleep(std::time::Duration::from_secs(RETRY_DELAY_SECS));
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);

                let message = match update.message {
                    Some(message) => message,
                    None => continue,
                };
                let text = match message.text {
                    Some(ref text) => text,
                    None => continue,
                };

                if let Some(reply) = self.handle_text(message.chat.id, text) {
                    if let Err(e) = self.api.send_message(message.chat.id, &reply) {
                        tracing::warn!(chat_id = message.chat.id, error = %e, "reply failed");
                    }
                }
            }
        }
    }

    fn register_commands(&self) -> TrackerResult<()> {
        self.api.set_my_commands(&[
            BotCommand::new("start", "Start the bot"),
            BotCommand::new("help", "Show help information"),
            BotCommand::new("about", "About this bot"),
            BotCommand::new("add_to_youtube", "Add a YouTube channel to track"),
            BotCommand::new("fetch_from_youtube", "Fetch latest videos from added channels"),
            BotCommand::new("collect_links", "Add several channels, one link per message"),
            BotCommand::new("done", "Finish collecting links"),
        ])?;
        Ok(())
    }

    /// Produce the reply for one incoming message, if any.
    fn handle_text(&mut self, chat_id: i64, text: &str) -> Option<String> {
        match parse_command(text) {
            Some(command) => Some(self.handle_command(chat_id, command)),
            None if self.sessions.is_collecting(chat_id) => {
                Some(self.collect_reference(chat_id, text.trim()))
            }
            None => None,
        }
    }

    fn handle_command(&mut self, chat_id: i64, command: Command<'_>) -> String {
        match command {
            Command::Start => "👋 Welcome! I track YouTube channels and report new uploads.\n\
                 Use /add_to_youtube <channel_url> [alias] to get started."
                .to_string(),
            Command::Help => "Commands:\n\
                 /add_to_youtube <channel_url> [alias] - track a channel\n\
                 /fetch_from_youtube [alias] - check one channel, or all of them\n\
                 /collect_links - add several channels, one link per message\n\
                 /done - finish collecting links"
                .to_string(),
            Command::About => {
                "Watches the RSS feeds of registered YouTube channels and reports new uploads."
                    .to_string()
            }
            Command::Add { args } => match args.split_first() {
                None => "Usage: /add_to_youtube <channel_url> [alias]".to_string(),
                Some((reference, rest)) => {
                    match self.registration.register(reference, rest.first().copied(), false) {
                        Ok(alias) => {
                            format!("Added channel with alias {} successfully!", alias)
                        }
                        Err(e) => e.to_string(),
                    }
                }
            },
            Command::Fetch { alias } => match self.polling.check(alias) {
                Ok(results) if results.is_empty() => {
                    "No channels registered yet. Use /add_to_youtube to track one.".to_string()
                }
                Ok(results) => report::render(&results),
                Err(e) => e.to_string(),
            },
            Command::CollectLinks => {
                if self.sessions.enter(chat_id) {
                    "Send channel links, one per message. Send /done when finished.".to_string()
                } else {
                    "Already collecting links. Send /done when finished.".to_string()
                }
            }
            Command::Done => match self.sessions.exit(chat_id) {
                None => "Not currently collecting links. Use /collect_links first.".to_string(),
                Some(tally) => {
                    let mut summary = format!("Done. Added {} channel(s).", tally.added.len());
                    if !tally.added.is_empty() {
                        summary.push_str(&format!(" Aliases: {}.", tally.added.join(", ")));
                    }
                    if tally.failed > 0 {
                        summary.push_str(&format!(" {} link(s) failed.", tally.failed));
                    }
                    summary
                }
            },
            Command::Unknown(_) => "❓ Unknown command. Try /help.".to_string(),
        }
    }

    /// One link sent during collect mode: register it under its default alias.
    fn collect_reference(&mut self, chat_id: i64, reference: &str) -> String {
        match self.registration.register(reference, None, false) {
            Ok(alias) => {
                self.sessions.record_added(chat_id, alias.clone());
                format!("Added '{}'.", alias)
            }
            Err(e) => {
                self.sessions.record_failed(chat_id);
                e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Registry;
    use crate::poller::FeedPoller;
    use crate::resolver::ChannelResolver;
    use crate::storage::traits::MockChannelRepository;

    fn bot_with(
        registration_repo: MockChannelRepository,
        polling_repo: MockChannelRepository,
    ) -> Bot<MockChannelRepository> {
        Bot::new(
            BotApi::new("TEST-TOKEN").unwrap(),
            RegistrationService::new(registration_repo, ChannelResolver::new()),
            PollService::new(polling_repo, FeedPoller::new()),
        )
    }

    fn idle_bot() -> Bot<MockChannelRepository> {
        bot_with(MockChannelRepository::new(), MockChannelRepository::new())
    }

    #[test]
    fn test_parse_add_with_alias() {
        let command = parse_command("/add_to_youtube https://youtube.com/@SomeChannel mb");
        assert_eq!(
            command,
            Some(Command::Add {
                args: vec!["https://youtube.com/@SomeChannel", "mb"]
            })
        );
    }

    #[test]
    fn test_parse_fetch_without_alias() {
        assert_eq!(
            parse_command("/fetch_from_youtube"),
            Some(Command::Fetch { alias: None })
        );
    }

    #[test]
    fn test_parse_strips_bot_mention() {
        assert_eq!(
            parse_command("/fetch_from_youtube@TubetrackBot mb"),
            Some(Command::Fetch { alias: Some("mb") })
        );
    }

    #[test]
    fn test_parse_plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello there"), None);
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(parse_command("/frobnicate"), Some(Command::Unknown("frobnicate")));
    }

    #[test]
    fn test_add_without_args_prints_usage() {
        let mut bot = idle_bot();

        let reply = bot.handle_text(1, "/add_to_youtube").unwrap();
        assert_eq!(reply, "Usage: /add_to_youtube <channel_url> [alias]");
    }

    #[test]
    fn test_fetch_with_no_channels() {
        let mut polling_repo = MockChannelRepository::new();
        polling_repo
            .expect_load_all()
            .returning(|| Ok(Registry::new()));

        let mut bot = bot_with(MockChannelRepository::new(), polling_repo);

        let reply = bot.handle_text(1, "/fetch_from_youtube").unwrap();
        assert!(reply.contains("No channels registered yet"));
    }

    #[test]
    fn test_fetch_unknown_alias_reply() {
        let mut polling_repo = MockChannelRepository::new();
        polling_repo
            .expect_load_all()
            .returning(|| Ok(Registry::new()));

        let mut bot = bot_with(MockChannelRepository::new(), polling_repo);

        let reply = bot.handle_text(1, "/fetch_from_youtube ghost").unwrap();
        assert_eq!(reply, "No channel registered under alias 'ghost'.");
    }

    #[test]
    fn test_collect_links_session_round_trip() {
        let mut bot = idle_bot();

        let entered = bot.handle_text(1, "/collect_links").unwrap();
        assert!(entered.contains("Send channel links"));

        let again = bot.handle_text(1, "/collect_links").unwrap();
        assert!(again.contains("Already collecting"));

        let done = bot.handle_text(1, "/done").unwrap();
        assert_eq!(done, "Done. Added 0 channel(s).");

        let idle = bot.handle_text(1, "/done").unwrap();
        assert!(idle.contains("Not currently collecting"));
    }

    #[test]
    fn test_plain_text_ignored_while_idle() {
        let mut bot = idle_bot();
        assert!(bot.handle_text(1, "just chatting").is_none());
    }

    #[test]
    fn test_unknown_command_reply() {
        let mut bot = idle_bot();
        let reply = bot.handle_text(1, "/frobnicate").unwrap();
        assert_eq!(reply, "❓ Unknown command. Try /help.");
    }
}
