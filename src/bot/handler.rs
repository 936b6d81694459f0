//! Handling of a single newly observed message.

use log::{debug, info};
use strum::Display;

use crate::error::Result;
use crate::types::GroupSnapshot;

use super::poll::Bot;
use super::trigger::{is_own_message, strip_trigger};

/// Why a new message did not get a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    OwnMessage,
    NoTrigger,
}

/// Result of one pass through the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No message newer than the last one seen
    Idle,
    /// A new message arrived but was not answered
    Ignored(SkipReason),
    /// A reply was posted with this text
    Replied(String),
}

impl Bot {
    /// Answer `snapshot`'s last message if it is addressed to the bot.
    pub(super) async fn handle_new_message(
        &self,
        snapshot: &GroupSnapshot,
    ) -> Result<PollOutcome> {
        let sender = &snapshot.last_sender;
        let text = &snapshot.last_message_text;

        if is_own_message(sender, &self.chatbot_name) {
            debug!(
                "Ignoring message {} from self ({})",
                snapshot.last_message_id, sender
            );
            return Ok(PollOutcome::Ignored(SkipReason::OwnMessage));
        }

        if !text.contains(self.trigger_word.as_str()) {
            debug!("Message {} has no trigger", snapshot.last_message_id);
            return Ok(PollOutcome::Ignored(SkipReason::NoTrigger));
        }

        info!(
            "Received message from {} in group {}: {}",
            sender, self.group_id, text
        );

        let user_prompt = strip_trigger(text, &self.trigger_word);
        let completion = self.completion.complete(&user_prompt).await?;
        let reply = completion.trim();

        self.chat.post_message(&self.group_id, reply).await?;
        info!("Replied to {} in group {}: {}", sender, self.group_id, reply);

        Ok(PollOutcome::Replied(reply.to_string()))
    }
}
