//! GoCardless HTTP client.
//!
//! This crate provides the [`Transport`](gocardless_core::Transport) used by
//! `gocardless-core` resources to reach the GoCardless API.
//!
//! # Example
//!
//! ```no_run
//! use gocardless_client::{ClientConfig, GoCardlessClient};
//! use gocardless_core::{set_default_context, Subscription};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GoCardlessClient::new(&ClientConfig::new("your-access-token"))?;
//! set_default_context(client.into_context())?;
//!
//! let mut subscription = Subscription::find("SB123").await?;
//! let user = subscription.user().await?;
//! println!("{} pays {:?}", user.id(), subscription.field("amount"));
//!
//! subscription.cancel().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;

pub use client::GoCardlessClient;
pub use config::{ClientConfig, Environment, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use error::ClientError;
