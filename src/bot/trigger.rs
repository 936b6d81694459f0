//! Trigger detection for incoming group messages.

/// Returns true when `sender` contains the bot's own name.
pub fn is_own_message(sender: &str, chatbot_name: &str) -> bool {
    sender.contains(chatbot_name)
}

/// Removes every occurrence of `trigger`, leaving surrounding spacing intact.
pub fn strip_trigger(text: &str, trigger: &str) -> String {
    if trigger.is_empty() {
        return text.to_string();
    }
    text.replace(trigger, "")
}
