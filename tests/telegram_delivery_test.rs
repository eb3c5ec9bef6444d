//! Tests for `TelegramDelivery` against a mocked Bot API (wiremock)
//!
//! Run with: cargo test --test telegram_delivery_test

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use classbot::core::DeliveryError;
use classbot::telegram::{Delivery, Keyboard, LastReplies, Reply, TelegramDelivery};
use teloxide::types::{ChatId, MessageId};
use teloxide::{Bot, RequestError};

const CHAT: ChatId = ChatId(123456789);

/// Test harness: a bot pointed at a local mock server
struct MockTelegram {
    server: MockServer,
    delivery: TelegramDelivery,
}

impl MockTelegram {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let bot = Bot::new("test_token_12345:ABCDEF").set_api_url(server.uri().parse().unwrap());
        Self {
            server,
            delivery: TelegramDelivery::new(bot),
        }
    }

    fn message(message_id: i32, extra: serde_json::Value) -> serde_json::Value {
        let mut result = json!({
            "message_id": message_id,
            "from": {
                "id": 987654321,
                "is_bot": true,
                "first_name": "ClassBot"
            },
            "chat": {
                "id": CHAT.0,
                "type": "private"
            },
            "date": 1735992000
        });
        if let (Some(result), Some(extra)) = (result.as_object_mut(), extra.as_object()) {
            result.extend(extra.clone());
        }
        json!({ "ok": true, "result": result })
    }

    async fn mock_send_message(&self, message_id: i32) {
        Mock::given(method("POST"))
            .and(path_regex("(?i)/bot[^/]+/sendMessage$"))
            .and(body_partial_json(json!({ "parse_mode": "HTML" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(Self::message(message_id, json!({ "text": "reply" }))),
            )
            .mount(&self.server)
            .await;
    }

    async fn mock_send_photo(&self, message_id: i32) {
        let photo = json!({
            "photo": [{
                "file_id": "AgADBAAD",
                "file_unique_id": "AQAD",
                "width": 90,
                "height": 90
            }]
        });
        Mock::given(method("POST"))
            .and(path_regex("(?i)/bot[^/]+/sendPhoto$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::message(message_id, photo)))
            .mount(&self.server)
            .await;
    }

    async fn mock_delete_message(&self, ok: bool) {
        let response = if ok {
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true }))
        } else {
            ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message to delete not found"
            }))
        };
        Mock::given(method("POST"))
            .and(path_regex("(?i)/bot[^/]+/deleteMessage$"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    async fn calls_to(&self, api_method: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| {
                r.url
                    .path()
                    .rsplit('/')
                    .next()
                    .is_some_and(|name| name.eq_ignore_ascii_case(api_method))
            })
            .count()
    }
}

#[tokio::test]
async fn test_send_text_returns_message_id() {
    let api = MockTelegram::new().await;
    api.mock_send_message(42).await;

    let id = api.delivery.send_text(CHAT, "📌 Домашнее задание", Keyboard::Main).await.unwrap();

    assert_eq!(id, MessageId(42));
    assert_eq!(api.calls_to("sendMessage").await, 1);
}

#[tokio::test]
async fn test_send_photo_by_file_id() {
    let api = MockTelegram::new().await;
    api.mock_send_photo(7).await;

    let id = api
        .delivery
        .send_photo(CHAT, "AgADBAAD", "Page 12", Keyboard::Main)
        .await
        .unwrap();

    assert_eq!(id, MessageId(7));
    assert_eq!(api.calls_to("sendPhoto").await, 1);
}

#[tokio::test]
async fn test_send_replacing_deletes_previous() {
    let api = MockTelegram::new().await;
    api.mock_send_message(42).await;
    api.mock_delete_message(true).await;
    let last_replies = LastReplies::new();
    let reply = Reply::Text {
        text: "Привет".to_string(),
        keyboard: Keyboard::Main,
    };

    last_replies.send_replacing(&api.delivery, CHAT, &reply).await.unwrap();
    assert_eq!(api.calls_to("deleteMessage").await, 0);

    last_replies.send_replacing(&api.delivery, CHAT, &reply).await.unwrap();
    assert_eq!(api.calls_to("deleteMessage").await, 1);
    assert_eq!(last_replies.get(CHAT).await, Some(MessageId(42)));
}

#[tokio::test]
async fn test_failed_delete_is_swallowed() {
    let api = MockTelegram::new().await;
    api.mock_send_message(42).await;
    api.mock_delete_message(false).await;
    let last_replies = LastReplies::new();
    let reply = Reply::Text {
        text: "Привет".to_string(),
        keyboard: Keyboard::Main,
    };

    last_replies.send_replacing(&api.delivery, CHAT, &reply).await.unwrap();
    let second = last_replies.send_replacing(&api.delivery, CHAT, &reply).await;

    assert_eq!(second.ok(), Some(MessageId(42)));
    assert_eq!(api.calls_to("sendMessage").await, 2);
}

#[tokio::test]
async fn test_failed_send_forgets_previous_reply() {
    let api = MockTelegram::new().await;
    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/sendMessage$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockTelegram::message(42, json!({ "text": "reply" }))))
        .up_to_n_times(1)
        .mount(&api.server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex("(?i)/bot[^/]+/sendMessage$"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        })))
        .mount(&api.server)
        .await;
    api.mock_delete_message(true).await;
    let last_replies = LastReplies::new();
    let reply = Reply::Text {
        text: "Привет".to_string(),
        keyboard: Keyboard::Main,
    };

    last_replies.send_replacing(&api.delivery, CHAT, &reply).await.unwrap();
    assert_eq!(last_replies.get(CHAT).await, Some(MessageId(42)));

    let err = last_replies
        .send_replacing(&api.delivery, CHAT, &reply)
        .await
        .unwrap_err();

    assert!(
        matches!(err, DeliveryError::Telegram(RequestError::Api(_))),
        "expected an API error, got {:?}",
        err
    );
    assert_eq!(api.calls_to("deleteMessage").await, 1);
    assert_eq!(api.calls_to("sendMessage").await, 2);
    assert_eq!(last_replies.get(CHAT).await, None);
}
