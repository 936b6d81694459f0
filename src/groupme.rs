//! Client for the GroupMe groups and messages endpoints.

use chrono::Utc;
use log::debug;
use url::Url;

use crate::error::{BotError, Result};
use crate::types::{GroupEnvelope, GroupSnapshot, OutgoingMessage, OutgoingMessageBody};

const GROUPME_API_URL: &str = "https://api.groupme.com/v3";

/// Returns true when `current` holds a message newer than `previous`.
///
/// Ids compare lexically; an absent id is the empty string and therefore
/// older than any real one.
pub fn has_new_message(previous: &GroupSnapshot, current: &GroupSnapshot) -> bool {
    current.last_message_id > previous.last_message_id
}

pub struct GroupMeClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl GroupMeClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: GROUPME_API_URL.to_string(),
        }
    }

    /// Points the client at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch the current state of `group_id`.
    pub async fn fetch_latest(&self, group_id: &str) -> Result<GroupSnapshot> {
        let url = self.endpoint(&["groups", group_id])?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(BotError::GroupMeApi { status, message });
        }

        let body = response.text().await?;
        let envelope: GroupEnvelope = serde_json::from_str(&body)?;
        debug!(
            "Fetched group {} (meta code {}), last message id '{}'",
            group_id,
            envelope.meta.code,
            envelope.response.messages.last_message_id
        );

        Ok(envelope.into())
    }

    /// Fetch a fresh snapshot and report whether it is newer than `last_seen`.
    pub async fn detect_new(
        &self,
        group_id: &str,
        last_seen: &GroupSnapshot,
    ) -> Result<(bool, GroupSnapshot)> {
        let current = self.fetch_latest(group_id).await?;
        Ok((has_new_message(last_seen, &current), current))
    }

    /// Post `text` to the group. The response body is ignored.
    pub async fn post_message(&self, group_id: &str, text: &str) -> Result<()> {
        let url = self.endpoint(&["groups", group_id, "messages"])?;
        let body = OutgoingMessage {
            message: OutgoingMessageBody {
                source_guid: source_guid(),
                text,
            },
        };

        let response = self.client.post(url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            return Err(BotError::GroupMeApi { status, message });
        }

        debug!("Posted {} characters to group {}", text.len(), group_id);
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| BotError::Config(format!("invalid API root: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }
}

/// Nanosecond UNIX timestamp used to de-duplicate submissions.
fn source_guid() -> String {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000))
        .to_string()
}
