//! Wire shapes of the GroupMe groups API and the snapshot built from them.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope returned by `GET /groups/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupEnvelope {
    #[serde(deserialize_with = "null_as_default")]
    pub meta: Meta,
    #[serde(deserialize_with = "null_as_default")]
    pub response: GroupResponse,
}

/// Response metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "null_as_default")]
    pub code: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GroupResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub messages: MessagesSummary,
}

/// Summary of the group's message thread.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagesSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub last_message_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_message_created_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub preview: Preview,
}

/// Preview of the most recent message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Preview {
    #[serde(deserialize_with = "null_as_default")]
    pub nickname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

/// The latest known state of a group's message thread.
///
/// Message ids are opaque strings that the API hands out in increasing
/// lexical order, so they are compared as strings, never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub group_id: String,
    pub name: String,
    pub last_message_id: String,
    pub last_message_text: String,
    pub last_sender: String,
    pub last_message_created_at: i64,
    pub message_count: u64,
}

impl From<GroupEnvelope> for GroupSnapshot {
    fn from(envelope: GroupEnvelope) -> Self {
        let response = envelope.response;
        let messages = response.messages;
        let group_id = if response.group_id.is_empty() {
            response.id
        } else {
            response.group_id
        };

        Self {
            group_id,
            name: response.name,
            last_message_id: messages.last_message_id,
            last_message_text: messages.preview.text,
            last_sender: messages.preview.nickname,
            last_message_created_at: messages.last_message_created_at,
            message_count: messages.count,
        }
    }
}

/// Body of `POST /groups/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct OutgoingMessage<'a> {
    pub message: OutgoingMessageBody<'a>,
}

#[derive(Debug, Serialize)]
pub struct OutgoingMessageBody<'a> {
    pub source_guid: String,
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_group_response() {
        let body = serde_json::json!({
            "meta": {"code": 200},
            "response": {
                "id": "1234",
                "group_id": "1234",
                "name": "Friends",
                "members": [{"user_id": "9", "nickname": "Alice"}],
                "messages": {
                    "count": 17,
                    "last_message_id": "165432",
                    "last_message_created_at": 1_660_000_000,
                    "preview": {
                        "nickname": "Alice",
                        "text": "hey !marv",
                        "image_url": null,
                        "attachments": []
                    }
                }
            }
        });

        let envelope: GroupEnvelope = serde_json::from_value(body).expect("valid body");
        assert_eq!(envelope.meta.code, 200);

        let snapshot = GroupSnapshot::from(envelope);
        assert_eq!(snapshot.group_id, "1234");
        assert_eq!(snapshot.name, "Friends");
        assert_eq!(snapshot.last_message_id, "165432");
        assert_eq!(snapshot.last_message_text, "hey !marv");
        assert_eq!(snapshot.last_sender, "Alice");
        assert_eq!(snapshot.message_count, 17);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let body = serde_json::json!({"response": {"id": "77", "messages": {"preview": {}}}});
        let envelope: GroupEnvelope = serde_json::from_value(body).expect("valid body");
        let snapshot = GroupSnapshot::from(envelope);

        assert_eq!(snapshot.group_id, "77");
        assert_eq!(snapshot.last_message_id, "");
        assert_eq!(snapshot.last_message_text, "");
        assert_eq!(snapshot.message_count, 0);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let body = serde_json::json!({
            "meta": {"code": null},
            "response": {
                "id": "77",
                "group_id": null,
                "name": null,
                "messages": {
                    "count": null,
                    "last_message_id": null,
                    "last_message_created_at": null,
                    "preview": {"nickname": null, "text": null}
                }
            }
        });
        let envelope: GroupEnvelope = serde_json::from_value(body).expect("valid body");
        assert_eq!(envelope.meta.code, 0);

        let snapshot = GroupSnapshot::from(envelope);
        assert_eq!(
            snapshot,
            GroupSnapshot {
                group_id: "77".to_string(),
                ..GroupSnapshot::default()
            }
        );
    }

    #[test]
    fn null_nested_objects_fall_back_to_defaults() {
        let body = serde_json::json!({"meta": null, "response": {"id": "5", "messages": null}});
        let envelope: GroupEnvelope = serde_json::from_value(body).expect("valid body");
        let snapshot = GroupSnapshot::from(envelope);

        assert_eq!(snapshot.group_id, "5");
        assert_eq!(snapshot.last_message_id, "");
    }

    #[test]
    fn outgoing_message_escapes_text() {
        let body = OutgoingMessage {
            message: OutgoingMessageBody {
                source_guid: "1".to_string(),
                text: "say \"hi\"\nplease",
            },
        };
        let json = serde_json::to_string(&body).expect("serializable");
        assert_eq!(
            json,
            r#"{"message":{"source_guid":"1","text":"say \"hi\"\nplease"}}"#
        );
    }
}
