//! Process-wide default context.
//!
//! Kept in its own test binary: the default context can only be set once per
//! process.

mod common;

use gocardless_core::{set_default_context, ResourceError, User};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn find_requires_configured_default() {
    let err = User::find("USR1").await.unwrap_err();
    assert!(matches!(err, ResourceError::Configuration(_)));

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/USR1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "USR1"})))
        .expect(1)
        .mount(&server)
        .await;

    set_default_context(common::client_for(&server).into_context()).unwrap();
    let user = User::find("USR1").await.unwrap();
    assert_eq!(user.id(), "USR1");

    let again = set_default_context(common::client_for(&server).into_context());
    assert!(matches!(again, Err(ResourceError::Configuration(_))));
}
