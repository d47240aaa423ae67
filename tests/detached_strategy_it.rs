#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use bearer_guard::{
	_preludet::*,
	config::{RefreshFields, StorageStrategy, WrapperConfig},
};

fn detached_config(base_url: &str) -> WrapperConfig {
	WrapperConfig::builder(base_url, "/auth/refresh", StorageStrategy::from_name("sessionStorage"))
		.build()
		.expect("Detached configuration should not need key names.")
}

#[tokio::test]
async fn detached_wrapper_refreshes_without_persisting() {
	let server = MockServer::start_async().await;
	let (wrapper, medium) = build_reqwest_test_wrapper(detached_config(&server.base_url()));

	medium.insert("access_token", "ignored");

	let anonymous = server
		.mock_async(|when, then| {
			when.method(GET).path("/orders").header_missing("authorization");
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/refresh")
				.json_body(json!({ "refresh_token": serde_json::Value::Null }));
			then.status(200).json_body(json!({ "access_token": "A9", "refresh_token": "R9" }));
		})
		.await;
	let renewed = server
		.mock_async(|when, then| {
			when.method(GET).path("/orders").header("authorization", "Bearer A9");
			then.status(200).body("[]");
		})
		.await;
	let response = wrapper
		.obtain_client("/orders")
		.get("")
		.await
		.expect("Replay should carry the freshly issued bearer.");

	anonymous.assert_async().await;
	refresh.assert_async().await;
	renewed.assert_async().await;

	assert_eq!(response.text(), "[]");
	assert_eq!(medium.peek("access_token"), Some("ignored".into()));
	assert_eq!(medium.peek("refresh_token"), None);
}

#[tokio::test]
async fn response_fields_are_independent_of_storage_keys() {
	let server = MockServer::start_async().await;
	let config = WrapperConfig::builder(
		server.base_url(),
		"/auth/refresh",
		StorageStrategy::LocalKeyValue,
	)
	.access_token_key("app.at")
	.refresh_token_key("app.rt")
	.response_fields(RefreshFields::default())
	.build()
	.expect("Configuration with decoupled response fields should build.");
	let (wrapper, medium) = build_reqwest_test_wrapper(config);

	medium.insert("app.at", "A1");
	medium.insert("app.rt", "R1");

	server
		.mock_async(|when, then| {
			when.method(DELETE).path("/sessions/7").header("authorization", "Bearer A1");
			then.status(401);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").json_body(json!({ "refresh_token": "R1" }));
			then.status(200).json_body(json!({ "access_token": "A2", "refresh_token": "R2" }));
		})
		.await;

	let deleted = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/sessions/7").header("authorization", "Bearer A2");
			then.status(204);
		})
		.await;

	wrapper
		.obtain_client("/sessions")
		.delete("/7")
		.await
		.expect("Replayed delete should succeed.");

	deleted.assert_async().await;

	assert_eq!(medium.peek("app.at"), Some("A2".into()));
	assert_eq!(medium.peek("app.rt"), Some("R2".into()));
}

#[test]
fn unknown_strategy_names_degrade_to_detached() {
	assert_eq!(StorageStrategy::from_name("sessionStorage"), StorageStrategy::Detached);
	assert!(detached_config("https://api.x").storage_keys().is_none());
}
