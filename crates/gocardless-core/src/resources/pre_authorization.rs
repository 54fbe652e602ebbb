//! Pre-authorizations: standing permission to bill a user up to a limit.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{cancel, referenced, Bill, Merchant, User};
use crate::error::Result;

resource_type!(
    PreAuthorization,
    PreAuthorization,
    "A standing authorization to bill a user.\n\nBills are created under it with \
     [`PreAuthorization::create_bill`]."
);

impl PreAuthorization {
    /// Current status (`active`, `cancelled`, ...).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// When the pre-authorization expires, if it does.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.date("expires_at")
    }

    /// Start of the next interval.
    #[must_use]
    pub fn next_interval_start(&self) -> Option<DateTime<Utc>> {
        self.date("next_interval_start")
    }

    /// Fetch the authorizing user.
    ///
    /// # Errors
    ///
    /// Returns a missing-field error if the payload had no `user_id`,
    /// otherwise propagates fetch errors.
    pub async fn user(&self) -> Result<User> {
        referenced(self, "user").await
    }

    /// Fetch the merchant.
    ///
    /// # Errors
    ///
    /// As [`PreAuthorization::user`].
    pub async fn merchant(&self) -> Result<Merchant> {
        referenced(self, "merchant").await
    }

    /// Create a bill under this pre-authorization, using its transport.
    ///
    /// # Errors
    ///
    /// As [`Bill::create_under_pre_authorization`].
    pub async fn create_bill(
        &self,
        amount: impl Into<Value>,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Bill> {
        Bill::create_under_pre_authorization(amount, self.id(), self.transport(), name, description)
            .await
    }

    /// Cancel the pre-authorization.
    ///
    /// # Errors
    ///
    /// Propagates transport errors; the resource is left unchanged on failure.
    pub async fn cancel(&mut self) -> Result<()> {
        cancel(&mut self.0).await
    }
}
