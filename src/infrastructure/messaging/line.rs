use std::sync::Arc;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{
    application::services::messenger::{BotClient, BotClientFactory},
    domain::{
        errors::BotError,
        models::{Event, EventKind, EventSource, MessagePayload, OutboundMessage},
    },
};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

/// LINE Messaging API client for one channel.
pub struct LineClient {
    http: Client,
    base_url: String,
    channel_secret: String,
    channel_token: String,
}

impl LineClient {
    pub fn new(
        http: Client,
        base_url: &str,
        channel_secret: &str,
        channel_token: &str,
    ) -> Result<Self, BotError> {
        if channel_secret.trim().is_empty() {
            return Err(BotError::MissingCredential("channel secret"));
        }
        if channel_token.trim().is_empty() {
            return Err(BotError::MissingCredential("channel access token"));
        }

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_secret: channel_secret.to_string(),
            channel_token: channel_token.to_string(),
        })
    }

    fn map_event(event: LineEvent) -> Event {
        let kind = match event.event_type.as_str() {
            "message" => EventKind::Message(
                event
                    .message
                    .map(Self::map_message)
                    .unwrap_or_else(|| MessagePayload::Other {
                        id: String::new(),
                        kind: "unknown".to_string(),
                    }),
            ),
            "postback" => EventKind::Postback {
                data: event.postback.map(|p| p.data).unwrap_or_default(),
            },
            "beacon" => {
                let beacon = event.beacon.unwrap_or_default();
                EventKind::Beacon {
                    hwid: beacon.hwid,
                    beacon_type: beacon.beacon_type,
                }
            }
            other => EventKind::Other(other.to_string()),
        };

        let source = match event.source {
            Some(source) => Self::map_source(source),
            None => EventSource::Unknown,
        };

        Event {
            kind,
            source,
            reply_token: event.reply_token,
            webhook_event_id: event.webhook_event_id,
            timestamp: DateTime::<Utc>::from_timestamp_millis(event.timestamp)
                .unwrap_or_else(Utc::now),
        }
    }

    fn map_message(message: LineMessage) -> MessagePayload {
        match (message.message_type.as_str(), message.text) {
            ("text", Some(text)) => MessagePayload::Text {
                id: message.id,
                text,
            },
            ("image", _) => MessagePayload::Image { id: message.id },
            (kind, _) => MessagePayload::Other {
                id: message.id,
                kind: kind.to_string(),
            },
        }
    }

    fn map_source(source: LineSource) -> EventSource {
        match (source.source_type.as_str(), source.group_id, source.room_id) {
            ("user", _, _) => match source.user_id {
                Some(user_id) => EventSource::User { user_id },
                None => EventSource::Unknown,
            },
            ("group", Some(group_id), _) => EventSource::Group {
                group_id,
                user_id: source.user_id,
            },
            ("room", _, Some(room_id)) => EventSource::Room {
                room_id,
                user_id: source.user_id,
            },
            _ => EventSource::Unknown,
        }
    }
}

#[async_trait]
impl BotClient for LineClient {
    fn parse_request(
        &self,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<Vec<Event>, BotError> {
        let signature = signature.ok_or(BotError::InvalidSignature)?;
        if !verify_signature(&self.channel_secret, body, signature) {
            return Err(BotError::InvalidSignature);
        }

        let payload: LineWebhook = serde_json::from_slice(body)
            .map_err(|err| BotError::MalformedRequest(err.to_string()))?;

        Ok(payload.events.into_iter().map(Self::map_event).collect())
    }

    async fn push_message(&self, message: &OutboundMessage) -> Result<(), BotError> {
        let url = format!("{}/v2/bot/message/push", self.base_url);
        let request = LinePushRequest {
            to: &message.user_id,
            messages: vec![LineTextMessage {
                message_type: "text",
                text: &message.text,
            }],
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.channel_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<LineErrorResponse>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(BotError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Builds a [`LineClient`] with its own HTTP transport for every request.
pub struct LineClientFactory {
    base_url: String,
    channel_secret: String,
    channel_token: String,
}

impl LineClientFactory {
    pub fn new(base_url: String, channel_secret: String, channel_token: String) -> Self {
        Self {
            base_url,
            channel_secret,
            channel_token,
        }
    }
}

impl BotClientFactory for LineClientFactory {
    fn build(&self) -> Result<Arc<dyn BotClient>, BotError> {
        let http = Client::builder().user_agent("linebot/push").build()?;
        let client = LineClient::new(
            http,
            &self.base_url,
            &self.channel_secret,
            &self.channel_token,
        )?;
        Ok(Arc::new(client) as Arc<dyn BotClient>)
    }
}

/// Checks the base64 HMAC-SHA256 of `body` sent in `X-Line-Signature`.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
pub(crate) fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

#[derive(Debug, Deserialize)]
struct LineWebhook {
    #[serde(default)]
    events: Vec<LineEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineEvent {
    #[serde(rename = "type")]
    event_type: String,
    source: Option<LineSource>,
    #[serde(default)]
    timestamp: i64,
    reply_token: Option<String>,
    webhook_event_id: Option<String>,
    message: Option<LineMessage>,
    postback: Option<LinePostback>,
    beacon: Option<LineBeacon>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineSource {
    #[serde(rename = "type")]
    source_type: String,
    user_id: Option<String>,
    group_id: Option<String>,
    room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LineMessage {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    message_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinePostback {
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct LineBeacon {
    #[serde(default)]
    hwid: String,
    #[serde(rename = "type", default)]
    beacon_type: String,
}

#[derive(Debug, Serialize)]
struct LinePushRequest<'a> {
    to: &'a str,
    messages: Vec<LineTextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct LineTextMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct LineErrorResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "channel-secret";

    const BODY: &str = r#"{
        "destination": "Ubot",
        "events": [
            {
                "type": "message",
                "replyToken": "r1",
                "webhookEventId": "01H0",
                "timestamp": 1462629479859,
                "source": {"type": "user", "userId": "U1"},
                "message": {"id": "100", "type": "text", "text": "すもも"}
            },
            {
                "type": "message",
                "timestamp": 1462629479860,
                "source": {"type": "user", "userId": "U1"},
                "message": {"id": "101", "type": "image", "contentProvider": {"type": "line"}}
            },
            {
                "type": "message",
                "timestamp": 1462629479861,
                "source": {"type": "room", "roomId": "R1", "userId": "U2"},
                "message": {"id": "102", "type": "sticker", "packageId": "1", "stickerId": "1"}
            },
            {
                "type": "postback",
                "timestamp": 1462629479862,
                "source": {"type": "group", "groupId": "G1", "userId": "U3"},
                "postback": {"data": "action=buy&itemid=111"}
            },
            {
                "type": "beacon",
                "timestamp": 1462629479863,
                "source": {"type": "user", "userId": "U4"},
                "beacon": {"hwid": "d41d8cd98f", "type": "enter"}
            },
            {
                "type": "follow",
                "timestamp": 1462629479864,
                "source": {"type": "user", "userId": "U5"}
            }
        ]
    }"#;

    fn client() -> LineClient {
        LineClient::new(Client::new(), DEFAULT_API_BASE_URL, SECRET, "token").unwrap()
    }

    #[test]
    fn signature_round_trip() {
        let signature = sign_body(SECRET, b"payload");

        assert!(verify_signature(SECRET, b"payload", &signature));
        assert!(!verify_signature("other-secret", b"payload", &signature));
        assert!(!verify_signature(SECRET, b"tampered", &signature));
        assert!(!verify_signature(SECRET, b"payload", "not base64 at all!"));
    }

    #[test]
    fn parses_every_event_kind_in_order() {
        let signature = sign_body(SECRET, BODY.as_bytes());
        let events = client()
            .parse_request(Some(&signature), BODY.as_bytes())
            .unwrap();

        let kinds: Vec<_> = events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Message(MessagePayload::Text {
                    id: "100".to_string(),
                    text: "すもも".to_string()
                }),
                EventKind::Message(MessagePayload::Image {
                    id: "101".to_string()
                }),
                EventKind::Message(MessagePayload::Other {
                    id: "102".to_string(),
                    kind: "sticker".to_string()
                }),
                EventKind::Postback {
                    data: "action=buy&itemid=111".to_string()
                },
                EventKind::Beacon {
                    hwid: "d41d8cd98f".to_string(),
                    beacon_type: "enter".to_string()
                },
                EventKind::Other("follow".to_string()),
            ]
        );

        assert_eq!(events[0].source.direct_user(), Some("U1"));
        assert_eq!(events[0].reply_token.as_deref(), Some("r1"));
        assert_eq!(events[0].timestamp.timestamp_millis(), 1462629479859);
        assert_eq!(
            events[2].source,
            EventSource::Room {
                room_id: "R1".to_string(),
                user_id: Some("U2".to_string())
            }
        );
        assert_eq!(
            events[3].source,
            EventSource::Group {
                group_id: "G1".to_string(),
                user_id: Some("U3".to_string())
            }
        );
    }

    #[test]
    fn rejects_missing_or_wrong_signature() {
        let wrong = sign_body("other-secret", BODY.as_bytes());

        assert!(matches!(
            client().parse_request(None, BODY.as_bytes()),
            Err(BotError::InvalidSignature)
        ));
        assert!(matches!(
            client().parse_request(Some(&wrong), BODY.as_bytes()),
            Err(BotError::InvalidSignature)
        ));
    }

    #[test]
    fn signed_garbage_is_malformed_not_invalid() {
        let body = b"{not json";
        let signature = sign_body(SECRET, body);

        let err = client().parse_request(Some(&signature), body).unwrap_err();
        assert!(matches!(err, BotError::MalformedRequest(_)));
        assert!(!err.is_invalid_signature());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        assert!(matches!(
            LineClient::new(Client::new(), DEFAULT_API_BASE_URL, "", "token"),
            Err(BotError::MissingCredential("channel secret"))
        ));
        assert!(matches!(
            LineClient::new(Client::new(), DEFAULT_API_BASE_URL, SECRET, " "),
            Err(BotError::MissingCredential("channel access token"))
        ));
    }

    #[test]
    fn factory_fails_without_secret() {
        let factory = LineClientFactory::new(
            DEFAULT_API_BASE_URL.to_string(),
            String::new(),
            "token".to_string(),
        );

        assert!(factory.build().is_err());
    }
}
