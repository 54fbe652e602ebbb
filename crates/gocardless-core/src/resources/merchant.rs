//! Merchants and their server-advertised collections.

use chrono::{DateTime, Utc};

use super::{ApiResource, Bill, PreAuthorization, Subscription, User};
use crate::error::{ResourceError, Result};
use crate::resource::SUB_RESOURCE_URIS;

resource_type!(
    Merchant,
    Merchant,
    "A merchant account.\n\nThe merchant's collections are advertised through \
     `sub_resource_uris`."
);

impl Merchant {
    /// When the next payout is due.
    #[must_use]
    pub fn next_payout_date(&self) -> Option<DateTime<Utc>> {
        self.date("next_payout_date")
    }

    /// Fetch the merchant's bills.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if the payload advertised no
    /// `bills` collection, otherwise propagates fetch errors.
    pub async fn bills(&self) -> Result<Vec<Bill>> {
        self.collection("bills").await
    }

    /// Fetch the merchant's users.
    ///
    /// # Errors
    ///
    /// As [`Merchant::bills`].
    pub async fn users(&self) -> Result<Vec<User>> {
        self.collection("users").await
    }

    /// Fetch the merchant's subscriptions.
    ///
    /// # Errors
    ///
    /// As [`Merchant::bills`].
    pub async fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.collection("subscriptions").await
    }

    /// Fetch the merchant's pre-authorizations.
    ///
    /// # Errors
    ///
    /// As [`Merchant::bills`].
    pub async fn pre_authorizations(&self) -> Result<Vec<PreAuthorization>> {
        self.collection("pre_authorizations").await
    }

    async fn collection<R: ApiResource>(&self, name: &str) -> Result<Vec<R>> {
        self.sub_resource(name)
            .ok_or_else(|| ResourceError::missing(format!("{SUB_RESOURCE_URIS}.{name}")))?
            .resolve_as()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{raw, RecordingTransport};
    use serde_json::json;

    #[tokio::test]
    async fn missing_collection_is_reported() {
        let merchant = Merchant::from_raw(
            raw(json!({"id": "MER1", "next_payout_date": "2013-02-01T00:00:00Z"})),
            RecordingTransport::shared(),
        )
        .unwrap();
        assert!(merchant.next_payout_date().is_some());

        let err = merchant.users().await.unwrap_err();
        assert!(matches!(
            err,
            ResourceError::MissingField { ref field } if field == "sub_resource_uris.users"
        ));
    }

    #[tokio::test]
    async fn users_are_fetched_from_advertised_path() {
        let transport = RecordingTransport::new();
        transport.respond(
            "/merchants/MER1/users",
            json!([{"id": "USR1"}, {"id": "USR2"}]),
        );
        let merchant = Merchant::from_raw(
            raw(json!({
                "id": "MER1",
                "sub_resource_uris": {"users": "https://gocardless.com/api/v1/merchants/MER1/users"}
            })),
            transport.clone(),
        )
        .unwrap();

        let users = merchant.users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id(), "USR2");
        assert_eq!(transport.calls(), vec!["GET /merchants/MER1/users".to_string()]);
    }
}
