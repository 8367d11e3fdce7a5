#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use zoho_sign_api::{
	_preludet::*,
	cache::{MemoryCache, TokenCache},
	flows::{ACCESS_TOKEN_CACHE_KEY, REFRESH_TOKEN_CACHE_KEY},
};

const TOKEN_PATH: &str = "/oauth/v2/token";

fn memory_cache() -> (Arc<MemoryCache>, Arc<dyn TokenCache>) {
	let backend = Arc::new(MemoryCache::default());
	let cache: Arc<dyn TokenCache> = backend.clone();

	(backend, cache)
}

#[tokio::test]
async fn cached_access_token_skips_token_endpoint() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body("{\"access_token\":\"unexpected\"}");
		})
		.await;
	let (client, _) = build_reqwest_test_client(&server.base_url(), "1000.cached").await;
	let token =
		client.credentials().access_token().await.expect("Cached access token should be served.");

	assert_eq!(token.expose(), "1000.cached");
	assert_eq!(client.credentials().metrics().cache_hits(), 1);

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn cache_miss_mints_once_and_writes_back() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"access_token\":\"1000.fresh\",\"api_domain\":\"https://www.zohoapis.com\",\"token_type\":\"Bearer\",\"expires_in_sec\":3600}",
				);
		})
		.await;
	let (backend, cache) = memory_cache();
	let client = test_client_builder(&server.base_url())
		.cache(cache)
		.refresh_token("1000.refresh")
		.build()
		.expect("Client should build.");
	let first = client.credentials().access_token().await.expect("First lookup should mint.");
	let second = client.credentials().access_token().await.expect("Second lookup should hit.");

	assert_eq!(first.expose(), "1000.fresh");
	assert_eq!(second.expose(), "1000.fresh");

	mock.assert_calls_async(1).await;

	let entry = backend
		.entry(ACCESS_TOKEN_CACHE_KEY)
		.expect("Minted access token should be written back to the cache.");
	let ttl = entry.expires_at - OffsetDateTime::now_utc();

	assert_eq!(entry.value, "1000.fresh");
	assert!(ttl > Duration::minutes(58) && ttl <= Duration::minutes(59), "Unexpected TTL {ttl}.");
	assert_eq!(client.credentials().metrics().access_generations(), 1);
}

#[tokio::test]
async fn setters_seed_the_cache() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body("{\"access_token\":\"unexpected\"}");
		})
		.await;
	let (backend, cache) = memory_cache();
	let client =
		test_client_builder(&server.base_url()).cache(cache).build().expect("Client should build.");

	client.set_refresh_token("1000.manual").await;
	client.credentials().set_access_token("1000.seeded", Duration::minutes(30)).await;

	let refresh = backend
		.entry(REFRESH_TOKEN_CACHE_KEY)
		.expect("Explicit refresh token should be mirrored into the cache.");

	assert_eq!(refresh.value, "1000.manual");

	let token =
		client.credentials().access_token().await.expect("Seeded access token should be served.");

	assert_eq!(token.expose(), "1000.seeded");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn without_cache_every_lookup_mints() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body("{\"access_token\":\"1000.uncached\",\"expires_in_sec\":3600}");
		})
		.await;
	let client = test_client_builder(&server.base_url())
		.refresh_token("1000.refresh")
		.build()
		.expect("Client should build.");

	for _ in 0..2 {
		let token = client.credentials().access_token().await.expect("Lookup should mint.");

		assert_eq!(token.expose(), "1000.uncached");
	}

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn missing_grant_code_reports_consent_url() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).body("{}");
		})
		.await;
	let mut config = test_service_config(&server.base_url());

	config.redirect_uri = Some(
		Url::parse("https://app.example.com/zoho/callback").expect("Redirect URI should parse."),
	);

	let client = test_client_builder(&server.base_url())
		.config(config)
		.build()
		.expect("Client should build.");
	let err = client
		.credentials()
		.access_token()
		.await
		.expect_err("Without any credential the lookup should fail.");

	match err {
		Error::GrantCodeMissing { consent_url } => {
			assert!(consent_url.starts_with(&server.url("/oauth/v2/auth")));
			assert!(consent_url.contains("client_id=client-test"));
			assert!(consent_url.contains("access_type=offline"));
			assert!(consent_url.contains("redirect_uri=https%3A%2F%2Fapp.example.com"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn grant_code_exchange_caches_both_tokens() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"access_token\":\"1000.access\",\"refresh_token\":\"1000.refresh\",\"expires_in_sec\":3600}",
				);
		})
		.await;
	let (backend, cache) = memory_cache();
	let client =
		test_client_builder(&server.base_url()).cache(cache).build().expect("Client should build.");

	client.set_grant_code("1000.grant");

	let token = client.credentials().access_token().await.expect("Bootstrap should succeed.");

	assert_eq!(token.expose(), "1000.access");

	// One exchange for the refresh token, one refresh grant for the access token.
	mock.assert_calls_async(2).await;

	assert_eq!(
		backend.entry(REFRESH_TOKEN_CACHE_KEY).map(|entry| entry.value),
		Some("1000.refresh".into())
	);
	assert!(backend.entry(ACCESS_TOKEN_CACHE_KEY).is_some());

	let refresh = client.credentials().refresh_token().await.expect("Refresh token is known.");

	assert_eq!(refresh.expose(), "1000.refresh");
	assert_eq!(client.credentials().metrics().refresh_generations(), 1);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn token_endpoint_errors_surface_as_api_errors() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_code\"}");
		})
		.await;
	let client = test_client_builder(&server.base_url())
		.refresh_token("1000.revoked")
		.build()
		.expect("Client should build.");
	let err = client
		.credentials()
		.generate_access_token()
		.await
		.expect_err("Token endpoint errors should propagate.");

	assert!(matches!(
		err,
		Error::Api { ref message, status: Some(200) } if message == "invalid_code"
	));

	mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_lookups_share_one_mint() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.delay(std::time::Duration::from_millis(200))
				.body("{\"access_token\":\"1000.shared\",\"expires_in_sec\":3600}");
		})
		.await;
	let (_, cache) = memory_cache();
	let client = test_client_builder(&server.base_url())
		.cache(cache)
		.refresh_token("1000.refresh")
		.build()
		.expect("Client should build.");
	let credentials = client.credentials();
	let (first, second) = tokio::join!(credentials.access_token(), credentials.access_token());

	assert_eq!(first.expect("First lookup should succeed.").expose(), "1000.shared");
	assert_eq!(second.expect("Second lookup should succeed.").expose(), "1000.shared");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_exchanges_redeem_the_grant_code_once() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).delay(std::time::Duration::from_millis(200)).body(
				"{\"access_token\":\"1000.access\",\"refresh_token\":\"1000.refresh\",\"expires_in_sec\":3600}",
			);
		})
		.await;
	let client = test_client_builder(&server.base_url())
		.grant_code("1000.grant")
		.build()
		.expect("Client should build.");
	let credentials = client.credentials();
	let (first, second) =
		tokio::join!(credentials.generate_refresh_token(), credentials.generate_refresh_token());
	let (redeemed, consumed) = match (first, second) {
		(Ok(token), Err(err)) | (Err(err), Ok(token)) => (token, err),
		other => panic!("Exactly one exchange should succeed: {other:?}."),
	};

	assert_eq!(redeemed.expose(), "1000.refresh");
	assert!(matches!(consumed, Error::GrantCodeMissing { .. }));
	assert_eq!(credentials.metrics().refresh_generations(), 1);

	mock.assert_calls_async(1).await;
}
