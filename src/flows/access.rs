//! Access token acquisition through the `refresh_token` grant.

// self
use crate::{
	_prelude::*,
	auth::{AccessTokenGrant, TokenSecret},
	flows::{
		ACCESS_TOKEN_CACHE_KEY, CACHE_TTL, CredentialManager, GrantType, read_cached, store_cached,
	},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl CredentialManager {
	/// Returns a live access token, minting one when the cache has none.
	///
	/// Cache failures are logged and treated as misses. A freshly minted token is written back
	/// under [`ACCESS_TOKEN_CACHE_KEY`] with [`CACHE_TTL`]; without a cache every call mints.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		let Some(cache) = self.cache.as_deref() else {
			return Ok(self.mint_access_token("access_token").await?.access_token);
		};

		if let Some(token) = read_cached(cache, &self.metrics, ACCESS_TOKEN_CACHE_KEY).await {
			return Ok(token);
		}

		let _singleflight = self.access_guard.lock().await;

		// Another caller may have refilled the cache while this one waited on the guard.
		if let Some(token) = read_cached(cache, &self.metrics, ACCESS_TOKEN_CACHE_KEY).await {
			return Ok(token);
		}

		let grant = self.mint_access_token("access_token").await?;

		store_cached(cache, &self.metrics, ACCESS_TOKEN_CACHE_KEY, &grant.access_token, CACHE_TTL)
			.await;

		Ok(grant.access_token)
	}

	/// Mints a new access token and caches it with the lifetime declared by the token endpoint.
	pub async fn generate_access_token(&self) -> Result<TokenSecret> {
		let grant = self.mint_access_token("generate_access_token").await?;

		if let Some(cache) = self.cache.as_deref() {
			store_cached(
				cache,
				&self.metrics,
				ACCESS_TOKEN_CACHE_KEY,
				&grant.access_token,
				grant.lifetime,
			)
			.await;
		}

		Ok(grant.access_token)
	}

	async fn mint_access_token(&self, stage: &'static str) -> Result<AccessTokenGrant> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let span = FlowSpan::new(KIND, stage);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let refresh_token = self.refresh_token().await?;

				self.metrics.record_access_generation();

				let (status, response) = self
					.request_token(
						GrantType::RefreshToken,
						vec![("refresh_token", refresh_token.expose().to_owned())],
					)
					.await?;

				response.into_access_token(status)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}
}
