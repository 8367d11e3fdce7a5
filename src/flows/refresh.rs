//! Refresh token resolution and the one-time grant-code exchange.
//!
//! The refresh token is looked up in memory first, then in the cache. Only when both miss is
//! the grant code exchanged (`grant_type=authorization_code`). Every exchange, including a
//! direct [`CredentialManager::generate_refresh_token`] call, runs under the refresh guard
//! even without a cache so a grant code is never redeemed twice concurrently.
//! A successful exchange keeps the refresh token in memory and clears the grant code.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::{
		ACCESS_TOKEN_CACHE_KEY, CredentialManager, GrantType, REFRESH_TOKEN_CACHE_KEY,
		read_cached, store_cached,
	},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl CredentialManager {
	/// Returns the refresh token, exchanging the grant code when none is known.
	pub async fn refresh_token(&self) -> Result<TokenSecret> {
		if let Some(token) = self.explicit_refresh_token() {
			return Ok(token);
		}
		if let Some(token) = self.cached_refresh_token().await {
			return Ok(token);
		}

		let _singleflight = self.refresh_guard.lock().await;

		if let Some(token) = self.explicit_refresh_token() {
			return Ok(token);
		}
		if let Some(token) = self.cached_refresh_token().await {
			return Ok(token);
		}

		self.exchange_grant_code().await
	}

	/// Exchanges the grant code for a refresh token.
	///
	/// Fails with [`Error::GrantCodeMissing`] (carrying a ready-to-use consent URL) when no
	/// grant code is set. On success both tokens are cached with the declared lifetime.
	/// Concurrent calls are serialized, so a grant code is redeemed at most once; later
	/// callers see the code already consumed.
	pub async fn generate_refresh_token(&self) -> Result<TokenSecret> {
		let _singleflight = self.refresh_guard.lock().await;

		self.exchange_grant_code().await
	}

	// Callers must hold `refresh_guard`.
	async fn exchange_grant_code(&self) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::RefreshToken;

		let span = FlowSpan::new(KIND, "generate_refresh_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let code = self.grant_code.read().clone().ok_or_else(|| {
					Error::GrantCodeMissing { consent_url: self.default_consent_url().to_string() }
				})?;

				self.metrics.record_refresh_generation();

				let (status, response) = self
					.request_token(
						GrantType::AuthorizationCode,
						vec![
							("code", code.expose().to_owned()),
							("state", self.config.state.clone()),
							("scope", self.config.scope_string()),
						],
					)
					.await?;
				let grant = response.into_code_exchange(status)?;

				*self.refresh_token.write() = Some(grant.refresh_token.clone());
				*self.grant_code.write() = None;

				if let Some(cache) = self.cache.as_deref() {
					if let Some(access_token) = &grant.access_token {
						store_cached(
							cache,
							&self.metrics,
							ACCESS_TOKEN_CACHE_KEY,
							access_token,
							grant.lifetime,
						)
						.await;
					}

					store_cached(
						cache,
						&self.metrics,
						REFRESH_TOKEN_CACHE_KEY,
						&grant.refresh_token,
						grant.lifetime,
					)
					.await;
				}

				Ok(grant.refresh_token)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	fn explicit_refresh_token(&self) -> Option<TokenSecret> {
		self.refresh_token.read().clone()
	}

	async fn cached_refresh_token(&self) -> Option<TokenSecret> {
		let cache = self.cache.as_deref()?;

		read_cached(cache, &self.metrics, REFRESH_TOKEN_CACHE_KEY).await
	}
}
