//! Bills: single payments, usually created under a pre-authorization.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{referenced, ApiResource, Merchant, User};
use crate::error::Result;
use crate::transport::SharedTransport;

/// Collection endpoint bills are created on.
pub const BILLS_PATH: &str = "/bills";

resource_type!(Bill, Bill, "A single payment.");

/// Body of a bill creation request.
#[derive(Debug, Clone, Serialize)]
pub struct BillInput {
    /// Amount to charge, sent as given.
    pub amount: Value,
    /// Pre-authorization the bill is created under.
    pub pre_authorization_id: String,
    /// Bill name shown to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Envelope for [`BillInput`].
#[derive(Debug, Clone, Serialize)]
pub struct CreateBillRequest {
    /// The bill to create.
    pub bill: BillInput,
}

impl Bill {
    /// When the bill was paid, if it has been.
    #[must_use]
    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.date("paid_at")
    }

    /// Current status (`pending`, `paid`, ...).
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// Fetch the paying user.
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
    /// As [`Bill::user`].
    pub async fn merchant(&self) -> Result<Merchant> {
        referenced(self, "merchant").await
    }

    /// Create a bill under a pre-authorization.
    ///
    /// `name` and `description` are only sent when present and non-empty.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and materialization errors of the response.
    pub async fn create_under_pre_authorization(
        amount: impl Into<Value>,
        pre_auth_id: &str,
        transport: &SharedTransport,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self> {
        let request = CreateBillRequest {
            bill: BillInput {
                amount: amount.into(),
                pre_authorization_id: pre_auth_id.to_string(),
                name: non_empty(name),
                description: non_empty(description),
            },
        };
        let params = serde_json::to_value(&request)?;

        tracing::debug!(pre_authorization_id = %pre_auth_id, "Creating bill");
        let response = transport.api_post(BILLS_PATH, &params).await?;
        Self::from_value(response, transport.clone())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
