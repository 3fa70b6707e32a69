use serde::Deserialize;

/// `{success, message}` acknowledgment returned by the order, SMS and coupon
/// endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            order_id: None,
        }
    }

    /// Server message, or `fallback` when it is missing or empty.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.message.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_checkout_success() {
        let ack: Ack = serde_json::from_str(
            r#"{"success": true, "message": "SMS code sent to your phone", "order_id": "42"}"#,
        )
        .unwrap();
        assert!(ack.success);
        assert_eq!(ack.order_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_decode_bare_success() {
        let ack: Ack = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(ack, Ack::ok());
    }

    #[test]
    fn test_message_fallback() {
        assert_eq!(Ack::rejected("").message_or("Invalid code"), "Invalid code");
        assert_eq!(Ack::default().message_or("Invalid code"), "Invalid code");
        assert_eq!(
            Ack::rejected("Order not found").message_or("Invalid code"),
            "Order not found"
        );
    }

    #[test]
    fn test_missing_success_is_decode_error() {
        assert!(serde_json::from_str::<Ack>(r#"{"message": "hi"}"#).is_err());
    }
}
