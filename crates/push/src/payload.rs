//! Notification payload construction.
//!
//! A payload is built fresh for every delivery request, encoded exactly once,
//! and the resulting blob is reused for each subscription in the batch. The
//! service worker on the client side reads these fields verbatim.

use serde::Serialize;

/// Default title when the caller provides none.
pub const DEFAULT_TITLE: &str = "TaskPulse";

/// Default body when the caller provides none.
pub const DEFAULT_BODY: &str = "You have a new notification";

const DEFAULT_ICON: &str = "/icons/icon-192.png";
const DEFAULT_BADGE: &str = "/icons/badge-72.png";

/// A notification ready for encoding. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    /// Forwarded untouched to the service worker (e.g. `{ "url": "/tasks/42" }`).
    pub data: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePayload<'a> {
    title: &'a str,
    body: &'a str,
    icon: &'a str,
    badge: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a serde_json::Value>,
    /// Task alerts must stay on screen until the employee dismisses them.
    require_interaction: bool,
}

impl NotificationPayload {
    /// Serialize into the single opaque blob sent to every endpoint.
    pub fn encode(&self) -> Vec<u8> {
        let wire = WirePayload {
            title: self.title.as_deref().unwrap_or(DEFAULT_TITLE),
            body: self.body.as_deref().unwrap_or(DEFAULT_BODY),
            icon: self.icon.as_deref().unwrap_or(DEFAULT_ICON),
            badge: self.badge.as_deref().unwrap_or(DEFAULT_BADGE),
            data: self.data.as_ref(),
            require_interaction: true,
        };

        // Invariant: WirePayload is string fields plus an already-parsed
        // Value, so serialization cannot fail. An empty blob must never be
        // substituted — every attempt in the batch reuses this output.
        serde_json::to_vec(&wire).expect("notification payload serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_defaults_applied_when_fields_absent() {
        let encoded = NotificationPayload::default().encode();
        let json = decode(&encoded);
        assert_eq!(json["title"], DEFAULT_TITLE);
        assert_eq!(json["body"], DEFAULT_BODY);
        assert_eq!(json["icon"], DEFAULT_ICON);
        assert_eq!(json["badge"], DEFAULT_BADGE);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_caller_fields_win_over_defaults() {
        let payload = NotificationPayload {
            title: Some("Task approved".to_string()),
            body: Some("Your quarterly report was approved".to_string()),
            data: Some(serde_json::json!({ "url": "/tasks/42" })),
            ..Default::default()
        };
        let json = decode(&payload.encode());
        assert_eq!(json["title"], "Task approved");
        assert_eq!(json["body"], "Your quarterly report was approved");
        assert_eq!(json["data"]["url"], "/tasks/42");
    }

    #[test]
    fn test_arbitrary_metadata_still_yields_valid_payload() {
        let payload = NotificationPayload {
            data: Some(serde_json::json!({
                "url": "/tasks/42",
                "tags": ["urgent", "façade", null],
                "nested": { "depth": [1, 2, {"x": null}] }
            })),
            ..Default::default()
        };
        let encoded = payload.encode();
        assert!(!encoded.is_empty());
        let json = decode(&encoded);
        assert_eq!(json["data"]["tags"][1], "façade");
        assert_eq!(json["title"], DEFAULT_TITLE);
    }

    #[test]
    fn test_interaction_flag_always_set() {
        let json = decode(&NotificationPayload::default().encode());
        assert_eq!(json["requireInteraction"], true);

        let custom = NotificationPayload {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let json = decode(&custom.encode());
        assert_eq!(json["requireInteraction"], true);
    }
}
