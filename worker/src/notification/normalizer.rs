// Payload -> notification descriptor
// Total: missing or malformed fields fall back, nothing here can fail

use super::{CarriedData, InboundPayload, NotificationAction, NotificationDescriptor};
use crate::config::WorkerConfig;

const DEFAULT_CHAT_ID: &str = "default";
const DEFAULT_SENDER: &str = "Someone";
const DEFAULT_MESSAGE: &str = "New message";

/// Which inbound route delivered the payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryPath {
    /// Messaging provider's background-message callback
    BackgroundMessage,
    /// Raw `push` event
    Push,
}

pub fn normalize(
    payload: &InboundPayload,
    path: DeliveryPath,
    config: &WorkerConfig,
    now_ms: f64,
) -> NotificationDescriptor {
    let chat_id = payload
        .data_str("chatId")
        .or(payload.message_id.as_deref())
        .unwrap_or(DEFAULT_CHAT_ID);

    let sender = payload
        .data_str("sender")
        .or(payload.notification_title.as_deref())
        .unwrap_or(DEFAULT_SENDER);

    let message = payload
        .data_str("message")
        .or(payload.notification_body.as_deref())
        .unwrap_or(DEFAULT_MESSAGE);

    let chat_name = payload
        .data_str("chatName")
        .or(payload.notification_title.as_deref())
        .unwrap_or(config.app.name.as_str());

    let is_group = payload.is_group();

    let (title, body) = if is_group {
        (chat_name.to_string(), format!("{}: {}", sender, message))
    } else {
        (sender.to_string(), message.to_string())
    };

    let mut actions = vec![NotificationAction::open()];
    let offer_close = match path {
        DeliveryPath::BackgroundMessage => true,
        DeliveryPath::Push => config.notification.close_action_on_push,
    };
    if offer_close {
        actions.push(NotificationAction::close());
    }

    NotificationDescriptor {
        title,
        body,
        icon: config.notification.icon.clone(),
        badge: config.notification.badge.clone(),
        tag: format!("{}{}", config.notification.tag_prefix, chat_id),
        data: CarriedData::capture(&payload.data, chat_id, chat_name, now_ms),
        require_interaction: config.notification.require_interaction,
        actions,
        vibrate: config.notification.vibrate.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{CLOSE_ACTION, OPEN_ACTION};
    use serde_json::{json, Value};

    const NOW: f64 = 1_730_000_000_000.0;

    fn run(payload: Value) -> NotificationDescriptor {
        normalize(
            &InboundPayload::from_value(&payload),
            DeliveryPath::BackgroundMessage,
            &WorkerConfig::default(),
            NOW,
        )
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        let descriptor = run(json!({}));
        assert_eq!(descriptor.title, "Someone");
        assert_eq!(descriptor.body, "New message");
        assert_eq!(descriptor.tag, "urchat-default");
        assert_eq!(descriptor.chat_id(), Some("default"));
        assert_eq!(descriptor.data.chat_name.as_deref(), Some("URChat"));
        assert_eq!(descriptor.data.timestamp, Some(NOW));
        assert!(descriptor.require_interaction);
    }

    #[test]
    fn test_direct_message() {
        let descriptor = run(json!({"data": {"sender": "Bob", "message": "yo", "chatId": "c42"}}));
        assert_eq!(descriptor.title, "Bob");
        assert_eq!(descriptor.body, "yo");
        assert_eq!(descriptor.tag, "urchat-c42");
    }

    #[test]
    fn test_group_message() {
        let descriptor = run(json!({"data": {
            "isGroup": "true",
            "chatName": "Team",
            "sender": "Alice",
            "message": "hi",
        }}));
        assert_eq!(descriptor.title, "Team");
        assert_eq!(descriptor.body, "Alice: hi");
    }

    #[test]
    fn test_truthy_looking_is_group_is_direct() {
        for value in [json!("True"), json!("1"), json!(true)] {
            let descriptor = run(json!({"data": {
                "isGroup": value,
                "chatName": "Team",
                "sender": "Alice",
                "message": "hi",
            }}));
            assert_eq!(descriptor.title, "Alice");
            assert_eq!(descriptor.body, "hi");
        }
    }

    #[test]
    fn test_notification_fields_as_fallbacks() {
        let descriptor = run(json!({"notification": {"title": "Carol", "body": "hello"}}));
        assert_eq!(descriptor.title, "Carol");
        assert_eq!(descriptor.body, "hello");
        assert_eq!(descriptor.data.chat_name.as_deref(), Some("Carol"));

        // data wins over notification
        let descriptor = run(json!({
            "notification": {"title": "Carol", "body": "hello"},
            "data": {"sender": "Dave", "message": "hey"},
        }));
        assert_eq!(descriptor.title, "Dave");
        assert_eq!(descriptor.body, "hey");
    }

    #[test]
    fn test_group_without_chat_name_uses_app_name() {
        let descriptor = run(json!({"data": {"isGroup": "true", "sender": "Alice"}}));
        assert_eq!(descriptor.title, "URChat");
        assert_eq!(descriptor.body, "Alice: New message");
    }

    #[test]
    fn test_chat_id_falls_back_to_message_id() {
        let descriptor = run(json!({"fcmMessageId": "m-9"}));
        assert_eq!(descriptor.tag, "urchat-m-9");

        let descriptor = run(json!({"fcmMessageId": "m-9", "data": {"chatId": "c1"}}));
        assert_eq!(descriptor.tag, "urchat-c1");
    }

    #[test]
    fn test_tag_depends_only_on_chat_id() {
        let a = run(json!({"data": {"chatId": "c1", "sender": "Alice", "message": "one"}}));
        let b = run(json!({"data": {"chatId": "c1", "sender": "Bob", "message": "two", "isGroup": "true"}}));
        let c = run(json!({"data": {"chatId": "c2", "sender": "Alice", "message": "one"}}));

        assert_eq!(a.tag, b.tag);
        assert_ne!(a.tag, c.tag);
    }

    #[test]
    fn test_carried_data_keeps_payload_fields() {
        let descriptor = run(json!({"data": {
            "chatId": "c1",
            "sender": "Alice",
            "avatar": "/a.png",
            "timestamp": "bogus",
        }}));
        let data = serde_json::to_value(&descriptor.data).unwrap();
        assert_eq!(data["chatId"], "c1");
        assert_eq!(data["chatName"], "URChat");
        assert_eq!(data["sender"], "Alice");
        assert_eq!(data["avatar"], "/a.png");
        assert_eq!(data["timestamp"], json!(NOW));
    }

    #[test]
    fn test_action_lists_per_path() {
        let payload = InboundPayload::from_value(&json!({"data": {"chatId": "c1"}}));
        let config = WorkerConfig::default();

        let background = normalize(&payload, DeliveryPath::BackgroundMessage, &config, NOW);
        let push = normalize(&payload, DeliveryPath::Push, &config, NOW);

        assert!(background.has_action(OPEN_ACTION));
        assert!(background.has_action(CLOSE_ACTION));
        assert!(push.has_action(OPEN_ACTION));
        assert!(!push.has_action(CLOSE_ACTION));
        assert_eq!(push.actions[0], NotificationAction::open());

        // Apart from actions, both paths agree
        let mut aligned = push.clone();
        aligned.actions = background.actions.clone();
        assert_eq!(aligned, background);
    }

    #[test]
    fn test_close_on_push_when_configured() {
        let mut config = WorkerConfig::default();
        config.notification.close_action_on_push = true;

        let push = normalize(&InboundPayload::default(), DeliveryPath::Push, &config, NOW);
        assert!(push.has_action(CLOSE_ACTION));
    }

    #[test]
    fn test_config_flows_into_descriptor() {
        let mut config = WorkerConfig::default();
        config.app.name = "Chatty".to_string();
        config.notification.tag_prefix = "chatty:".to_string();
        config.notification.require_interaction = false;
        config.notification.vibrate = vec![50];

        let descriptor = normalize(
            &InboundPayload::from_value(&json!({"data": {"isGroup": "true", "chatId": "x"}})),
            DeliveryPath::Push,
            &config,
            NOW,
        );
        assert_eq!(descriptor.title, "Chatty");
        assert_eq!(descriptor.tag, "chatty:x");
        assert!(!descriptor.require_interaction);
        assert_eq!(descriptor.vibrate, vec![50]);
    }
}
