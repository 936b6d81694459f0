//! The polling loop and the state it carries between iterations.

use std::time::Duration;

use log::{debug, info, warn};

use crate::completion::CompletionClient;
use crate::config::{Config, ErrorPolicy};
use crate::error::Result;
use crate::groupme::GroupMeClient;
use crate::types::GroupSnapshot;

use super::handler::PollOutcome;

/// Pause between polls when nothing new arrived.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct Bot {
    pub(super) chat: GroupMeClient,
    pub(super) completion: CompletionClient,
    pub(super) group_id: String,
    pub(super) chatbot_name: String,
    pub(super) trigger_word: String,
    on_error: ErrorPolicy,
    poll_interval: Duration,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        let chat = GroupMeClient::new(config.token.clone());
        let completion = CompletionClient::new(config.gpt_token.clone());
        Self::with_clients(chat, completion, config)
    }

    /// Build a bot around pre-configured clients.
    pub fn with_clients(
        chat: GroupMeClient,
        completion: CompletionClient,
        config: Config,
    ) -> Self {
        Self {
            chat,
            completion,
            group_id: config.group_id,
            chatbot_name: config.chatbot_name,
            trigger_word: config.trigger_word,
            on_error: config.on_error,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the idle pause between polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Fetch the snapshot that later polls are compared against.
    pub async fn baseline(&self) -> Result<GroupSnapshot> {
        self.chat.fetch_latest(&self.group_id).await
    }

    /// Run one poll against `last_seen` and return the snapshot to carry forward.
    ///
    /// A newer snapshot replaces `last_seen` before it is handled, so a message
    /// whose reply failed is not picked up again on the next poll.
    pub async fn poll_once(
        &self,
        last_seen: GroupSnapshot,
    ) -> (GroupSnapshot, Result<PollOutcome>) {
        let current = match self.chat.detect_new(&self.group_id, &last_seen).await {
            Ok((true, current)) => current,
            Ok((false, _)) => return (last_seen, Ok(PollOutcome::Idle)),
            Err(e) => return (last_seen, Err(e)),
        };

        debug!(
            "New message {} (previous {})",
            current.last_message_id, last_seen.last_message_id
        );
        let outcome = self.handle_new_message(&current).await;
        (current, outcome)
    }
}

/// Poll the group forever. Returns only when an error is fatal under the
/// configured policy.
pub async fn run_poll_loop(bot: &Bot) -> Result<()> {
    let mut last_seen = bot.baseline().await?;
    info!(
        "Watching group {} ({}) from message '{}'",
        bot.group_id, last_seen.name, last_seen.last_message_id
    );

    loop {
        let (next, outcome) = bot.poll_once(last_seen).await;
        last_seen = next;

        match outcome {
            Ok(PollOutcome::Idle) => tokio::time::sleep(bot.poll_interval).await,
            Ok(PollOutcome::Ignored(reason)) => {
                debug!("Skipped message {}: {}", last_seen.last_message_id, reason);
            }
            Ok(PollOutcome::Replied(_)) => {}
            Err(e) if bot.on_error == ErrorPolicy::Continue && e.is_remote() => {
                warn!("Poll failed, continuing: {}", e);
                tokio::time::sleep(bot.poll_interval).await;
            }
            Err(e) => return Err(e),
        }
    }
}
