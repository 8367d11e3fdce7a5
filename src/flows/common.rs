//! Shared helpers for the token flows (token endpoint requests, best-effort cache access).

// self
use crate::{
	_prelude::*,
	auth::{TokenResponse, TokenSecret},
	cache::TokenCache,
	flows::{CredentialManager, TokenMetrics},
	http::{ApiRequest, HttpMethod},
	obs,
};

/// OAuth grant types sent to the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
	/// Exchanges a one-time grant code for a refresh token.
	AuthorizationCode,
	/// Mints an access token from the refresh token.
	RefreshToken,
}
impl GrantType {
	/// Returns the `grant_type` form value.
	pub const fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

impl CredentialManager {
	/// Posts a token request carrying the client credentials plus `params`.
	pub(crate) async fn request_token(
		&self,
		grant: GrantType,
		params: Vec<(&'static str, String)>,
	) -> Result<(u16, TokenResponse)> {
		let mut request = ApiRequest::new(HttpMethod::Post, self.config.endpoints.token.clone());

		for (key, value) in params {
			request = request.with_form_field(key, value);
		}

		let request = request
			.with_form_field("client_id", self.client_id.as_str())
			.with_form_field("client_secret", self.client_secret.expose())
			.with_form_field("grant_type", grant.as_str());
		let response = self.http_client.execute(request).await?;
		let parsed = TokenResponse::parse(response.status, &response.body)?;

		Ok((response.status, parsed))
	}
}

/// Reads `key` from the cache; failures are reported and treated as a miss.
pub(crate) async fn read_cached(
	cache: &dyn TokenCache,
	metrics: &TokenMetrics,
	key: &str,
) -> Option<TokenSecret> {
	let value = match cache.get(key).await {
		Ok(value) => value.and_then(TokenSecret::non_empty),
		Err(e) => {
			obs::cache_fault(key, "get", &e);
			metrics.record_fault();

			None
		},
	};

	obs::cache_lookup(key, value.is_some());
	metrics.record_lookup(value.is_some());

	value
}

/// Writes `token` under `key`; failures are reported and otherwise ignored.
pub(crate) async fn store_cached(
	cache: &dyn TokenCache,
	metrics: &TokenMetrics,
	key: &str,
	token: &TokenSecret,
	ttl: Duration,
) {
	if let Err(e) = cache.set(key, token.expose(), ttl).await {
		obs::cache_fault(key, "set", &e);
		metrics.record_fault();
	}
}
