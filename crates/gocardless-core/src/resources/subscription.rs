//! Subscriptions: recurring payments from a user to a merchant.

use chrono::{DateTime, Utc};

use super::{cancel, referenced, Merchant, User};
use crate::error::Result;

resource_type!(
    Subscription,
    Subscription,
    "A recurring payment from a user to a merchant."
);

impl Subscription {
    /// Current status (`active`, `cancelled`, ...).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// When the subscription expires, if it does.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.date("expires_at")
    }

    /// Start of the next billing interval.
    #[must_use]
    pub fn next_interval_start(&self) -> Option<DateTime<Utc>> {
        self.date("next_interval_start")
    }

    /// Fetch the paying user. Every call performs a new request.
    ///
    /// # Errors
    ///
    /// Returns a missing-field error if the payload had no `user_id`,
    /// otherwise propagates fetch errors.
    pub async fn user(&self) -> Result<User> {
        referenced(self, "user").await
    }

    /// Fetch the merchant. Every call performs a new request.
    ///
    /// # Errors
    ///
    /// As [`Subscription::user`].
    pub async fn merchant(&self) -> Result<Merchant> {
        referenced(self, "merchant").await
    }

    /// Cancel the subscription.
    ///
    /// `status` is updated from the response only after the request succeeds.
    ///
    /// # Errors
    ///
    /// Propagates transport errors; the resource is left unchanged on failure.
    pub async fn cancel(&mut self) -> Result<()> {
        cancel(&mut self.0).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceError;
    use crate::resources::ApiResource;
    use crate::testing::{raw, RecordingTransport};
    use chrono::TimeZone;
    use serde_json::json;

    fn subscription_payload() -> serde_json::Value {
        json!({
            "id": "SB123",
            "expires_at": "2013-05-01T00:00:00Z",
            "user_id": "USR1",
            "merchant_id": "MER1",
            "status": "active"
        })
    }

    #[tokio::test]
    async fn user_reference_fetches_once_per_call() {
        let transport = RecordingTransport::new();
        transport.respond("/users/USR1", json!({"id": "USR1", "email": "ann@example.com"}));
        let subscription =
            Subscription::from_raw(raw(subscription_payload()), transport.clone()).unwrap();

        assert_eq!(subscription.id(), "SB123");
        assert_eq!(subscription.status(), Some("active"));
        assert_eq!(
            subscription.expires_at(),
            Some(Utc.with_ymd_and_hms(2013, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(subscription.next_interval_start(), None);
        assert!(transport.calls().is_empty());

        let user = subscription.user().await.unwrap();
        assert_eq!(user.id(), "USR1");
        assert_eq!(transport.calls(), vec!["GET /users/USR1".to_string()]);

        subscription.user().await.unwrap();
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn cancel_overwrites_status_only() {
        let transport = RecordingTransport::new();
        transport.respond("/subscriptions/SB123/cancel", json!({"status": "cancelled"}));
        let mut subscription =
            Subscription::from_raw(raw(subscription_payload()), transport.clone()).unwrap();
        let before = subscription.clone();

        subscription.cancel().await.unwrap();

        assert_eq!(subscription.status(), Some("cancelled"));
        assert_eq!(transport.calls(), vec!["PUT /subscriptions/SB123/cancel".to_string()]);
        assert_eq!(transport.bodies(), vec![None]);
        assert_eq!(subscription.raw_attributes(), before.raw_attributes());
        assert_eq!(subscription.dates(), before.dates());
        assert_eq!(subscription.fields().len(), before.fields().len());
    }

    #[tokio::test]
    async fn failed_cancel_leaves_status() {
        let transport = RecordingTransport::new();
        let mut subscription =
            Subscription::from_raw(raw(subscription_payload()), transport.clone()).unwrap();

        let err = subscription.cancel().await.unwrap_err();

        assert!(matches!(err, ResourceError::Transport(_)));
        assert_eq!(subscription.status(), Some("active"));
    }

    #[tokio::test]
    async fn missing_reference_is_reported() {
        let subscription = Subscription::from_raw(
            raw(json!({"id": "SB1", "merchant_id": "MER1"})),
            RecordingTransport::shared(),
        )
        .unwrap();
        let err = subscription.user().await.unwrap_err();
        assert!(matches!(err, ResourceError::MissingField { ref field } if field == "user_id"));
    }
}
