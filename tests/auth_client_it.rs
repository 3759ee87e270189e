#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use bearer_reauth::{
	auth::Token,
	client::AuthClient,
	fetch::{FetchMethod, FetcherConfig, ReqwestTokenFetcher},
	service::TokenService,
	store::{MemoryStore, TokenStore},
	url::Url,
};

fn build_client(server: &MockServer, seed: &str, method: FetchMethod) -> (AuthClient, MemoryStore) {
	let endpoint =
		Url::parse(&server.url("/token")).expect("Mock token endpoint should parse successfully.");
	let config = FetcherConfig::builder(endpoint)
		.method(method)
		.build()
		.expect("Fetcher config should build for the mock endpoint.");
	let store = MemoryStore::with_token(seed);
	let service =
		TokenService::new(Arc::new(store.clone()), Arc::new(ReqwestTokenFetcher::new(config)));

	(AuthClient::new(service), store)
}

#[tokio::test]
async fn rejected_request_is_refreshed_and_resent() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).header("content-type", "application/json").body("{\"token\":\"xyz\"}");
		})
		.await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/data").header("authorization", "Bearer abc");
			then.status(401);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/data").header("authorization", "Bearer xyz");
			then.status(200).body("ok");
		})
		.await;
	let (client, store) = build_client(&server, "abc", FetchMethod::Get);
	let response = client
		.send(client.get(server.url("/api/data")))
		.await
		.expect("Request should complete after re-authentication.");

	assert_eq!(response.status().as_u16(), 200);
	assert_eq!(response.text().await.expect("Response body should be readable."), "ok");

	token_mock.assert_calls_async(1).await;
	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;

	assert_eq!(
		store.get().await.expect("Reading the store should succeed."),
		Some(Token::new("xyz"))
	);
}

#[tokio::test]
async fn persistent_rejection_stops_after_three_retries_per_request() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).body("{\"token\":\"xyz\"}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/data");
			then.status(401);
		})
		.await;
	let (client, _) = build_client(&server, "abc", FetchMethod::Post);
	let response = client
		.send(client.get(server.url("/api/data")))
		.await
		.expect("Declined requests should still return the last response.");

	assert_eq!(response.status().as_u16(), 401);

	api.assert_calls_async(4).await;
	token_mock.assert_calls_async(3).await;

	let response = client
		.send(client.get(server.url("/api/data")))
		.await
		.expect("A new logical request should start a fresh retry chain.");

	assert_eq!(response.status().as_u16(), 401);

	api.assert_calls_async(8).await;
	token_mock.assert_calls_async(6).await;
	assert_eq!(client.service().refresh_metrics.attempts(), 6);
}

#[tokio::test]
async fn failing_token_endpoint_surfaces_original_rejection() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(500);
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/data");
			then.status(401).body("denied");
		})
		.await;
	let (client, store) = build_client(&server, "abc", FetchMethod::Get);
	let response = client
		.send(client.get(server.url("/api/data")))
		.await
		.expect("Fetch failures should not surface as errors.");

	assert_eq!(response.status().as_u16(), 401);
	assert_eq!(response.text().await.expect("Response body should be readable."), "denied");

	api.assert_calls_async(1).await;
	token_mock.assert_calls_async(1).await;

	assert_eq!(
		store.get().await.expect("Reading the store should succeed."),
		Some(Token::new("abc"))
	);
	assert_eq!(client.service().refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn header_illegal_tokens_are_never_stored() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).body("{\"token\":\"bad\\ntoken\"}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/data").header("authorization", "Bearer abc");
			then.status(401);
		})
		.await;
	let (client, store) = build_client(&server, "abc", FetchMethod::Get);

	for _ in 0..2 {
		let response = client
			.send(client.get(server.url("/api/data")))
			.await
			.expect("Requests should still be sent with the previous token.");

		assert_eq!(response.status().as_u16(), 401);
		assert_eq!(
			store.get().await.expect("Reading the store should succeed."),
			Some(Token::new("abc"))
		);
	}

	api.assert_calls_async(2).await;
	token_mock.assert_calls_async(2).await;
	assert_eq!(client.service().refresh_metrics.failures(), 2);
}

#[tokio::test]
async fn accepted_requests_carry_the_stored_token_once() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).body("{\"token\":\"unused\"}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/data").header("authorization", "Bearer abc");
			then.status(200);
		})
		.await;
	let (client, _) = build_client(&server, "abc", FetchMethod::Get);
	let request = client
		.get(server.url("/api/data"))
		.header("authorization", "Bearer overridden")
		.build()
		.expect("Request should build.");
	let response = client.execute(request).await.expect("Signed request should succeed.");

	assert_eq!(response.status().as_u16(), 200);

	api.assert_calls_async(1).await;
	token_mock.assert_calls_async(0).await;
}
