//! Async Zoho Sign API client: a cache-aware OAuth 2.0 credential manager, an authenticated
//! gateway, and convention-driven resource modules for templates and signing requests.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod gateway;
pub mod http;
pub mod obs;
pub mod resource;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for unit and integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		cache::{MemoryCache, TokenCache},
		client::{ZohoSign, ZohoSignBuilder},
		config::ServiceConfig,
		http::ReqwestHttpClient,
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Points every endpoint of a [`ServiceConfig`] at the provided mock server base URL.
	pub fn test_service_config(base_url: &str) -> ServiceConfig {
		let base = base_url.trim_end_matches('/');

		ServiceConfig::builder()
			.authorization_endpoint(
				Url::parse(&format!("{base}/oauth/v2/auth"))
					.expect("Mock authorization endpoint should parse successfully."),
			)
			.token_endpoint(
				Url::parse(&format!("{base}/oauth/v2/token"))
					.expect("Mock token endpoint should parse successfully."),
			)
			.api_base(
				Url::parse(&format!("{base}/api/v1/"))
					.expect("Mock API base URL should parse successfully."),
			)
			.guest_sign_endpoint(
				Url::parse(&format!("{base}/zsguest"))
					.expect("Mock guest sign endpoint should parse successfully."),
			)
			.build()
			.expect("Mock service configuration should build successfully.")
	}

	/// Starts a [`ZohoSign`] builder wired to the mock server and the insecure test transport.
	pub fn test_client_builder(base_url: &str) -> ZohoSignBuilder {
		ZohoSign::builder("client-test", "secret-test")
			.config(test_service_config(base_url))
			.http_client(test_reqwest_http_client())
	}

	/// Constructs a [`ZohoSign`] client backed by an in-memory cache that already holds a
	/// live access token, so API calls never reach the token endpoint.
	pub async fn build_reqwest_test_client(
		base_url: &str,
		access_token: &str,
	) -> (ZohoSign, Arc<MemoryCache>) {
		let cache_backend = Arc::new(MemoryCache::default());
		let cache: Arc<dyn TokenCache> = cache_backend.clone();

		cache
			.set(crate::flows::ACCESS_TOKEN_CACHE_KEY, access_token, Duration::minutes(59))
			.await
			.expect("Seeding the access token into the memory cache should succeed.");

		let client = test_client_builder(base_url)
			.cache(cache)
			.build()
			.expect("Test client should build successfully.");

		(client, cache_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use indexmap::IndexMap;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
