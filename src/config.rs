use std::path::Path;
use std::str::FromStr;

use ini::{Ini, ParseOption, Properties};
use log::{debug, error, info};
use strum::{Display, EnumString};

use crate::error::{BotError, Result};

/// Default location of the bot configuration, relative to the working directory.
pub const CONFIG_FILE: &str = "chatbot.ini";

/// What the poll loop does when a remote call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the bot and exit with an error.
    #[default]
    Exit,
    /// Log the failure and keep polling.
    Continue,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub group_id: String,
    pub gpt_token: String,
    pub chatbot_name: String,
    pub trigger_word: String,
    pub on_error: ErrorPolicy,
}

impl Config {
    /// Loads the keys of the section-less part of the INI file at `path`.
    ///
    /// Values are taken literally: no quote stripping, escapes or variable
    /// substitution.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_file_opt(path, options).map_err(|e| {
            error!("Failed to load {}: {}", path.display(), e);
            e
        })?;

        Self::from_section(ini.general_section())
    }

    fn from_section(entries: &Properties) -> Result<Self> {
        let token = required(entries, "token")?;
        let group_id = required(entries, "group_id")?;
        let gpt_token = required(entries, "gpt_token")?;
        let chatbot_name = required(entries, "chatbot_name")?;
        let trigger_word = required(entries, "trigger_word")?;

        let on_error = match entries.get("on_error").map(|v| v.trim()) {
            None | Some("") => ErrorPolicy::default(),
            Some(value) => ErrorPolicy::from_str(value).map_err(|_| {
                BotError::Config(format!(
                    "on_error must be 'exit' or 'continue', got '{value}'"
                ))
            })?,
        };

        info!("Configuration loaded successfully");
        debug!("GroupMe token length: {} characters", token.len());
        debug!("Completion API token length: {} characters", gpt_token.len());
        debug!("Group ID: {}", group_id);
        debug!("Chatbot name: {}", chatbot_name);
        debug!("Trigger word: {}", trigger_word);
        debug!("Error policy: {}", on_error);

        Ok(Self {
            token,
            group_id,
            gpt_token,
            chatbot_name,
            trigger_word,
            on_error,
        })
    }
}

fn required(entries: &Properties, key: &str) -> Result<String> {
    match entries.get(key).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => {
            error!("Missing required configuration key '{}'", key);
            Err(BotError::Config(format!("missing required key '{key}'")))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    const FULL: &str = "\
# bot settings
token=abc123
group_id=42
gpt_token=sk-test
chatbot_name=Marv
trigger_word=!marv
";

    #[test]
    fn loads_all_keys() {
        let file = write_config(FULL);
        let config = Config::from_file(file.path()).expect("valid config");

        assert_eq!(config.token, "abc123");
        assert_eq!(config.group_id, "42");
        assert_eq!(config.gpt_token, "sk-test");
        assert_eq!(config.chatbot_name, "Marv");
        assert_eq!(config.trigger_word, "!marv");
        assert_eq!(config.on_error, ErrorPolicy::Exit);
    }

    #[test]
    fn reads_error_policy() {
        let file = write_config(&format!("{FULL}on_error=Continue\n"));
        let config = Config::from_file(file.path()).expect("valid config");
        assert_eq!(config.on_error, ErrorPolicy::Continue);
    }

    #[test]
    fn rejects_unknown_error_policy() {
        let file = write_config(&format!("{FULL}on_error=retry\n"));
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn missing_key_is_reported() {
        let file = write_config("token=abc123\ngroup_id=42\n");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("gpt_token"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let file = write_config(&FULL.replace("trigger_word=!marv", "trigger_word="));
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("trigger_word"));
    }

    #[test]
    fn values_are_taken_literally() {
        let file = write_config(
            "\
; GroupMe settings
token=abc123
group_id=42
gpt_token=sk-test
chatbot_name=Marv's Bot
trigger_word=$marv
",
        );
        let config = Config::from_file(file.path()).expect("valid config");

        assert_eq!(config.chatbot_name, "Marv's Bot");
        assert_eq!(config.trigger_word, "$marv");
    }

    #[test]
    fn spaces_around_separator_are_trimmed() {
        let file = write_config(&FULL.replace("chatbot_name=Marv", "chatbot_name = Marv Bot"));
        let config = Config::from_file(file.path()).expect("valid config");
        assert_eq!(config.chatbot_name, "Marv Bot");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = Config::from_file(dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, BotError::ConfigFile(_)));
    }
}
