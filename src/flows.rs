//! Credential lifecycle: access/refresh token acquisition, caching, and the two OAuth grants.

pub mod access;
pub mod common;
pub mod metrics;
pub mod refresh;

pub use common::*;
pub use metrics::TokenMetrics;

// self
use crate::{
	_prelude::*,
	auth::{self, TokenSecret},
	cache::TokenCache,
	config::ServiceConfig,
	error::ConfigError,
	http::ApiHttpClient,
};

/// Cache key holding the current access token.
pub const ACCESS_TOKEN_CACHE_KEY: &str = "zoho_sign_access_token";
/// Cache key holding the refresh token.
pub const REFRESH_TOKEN_CACHE_KEY: &str = "zoho_sign_refresh_token";
/// TTL applied when a regenerated token is written back to the cache.
pub const CACHE_TTL: Duration = Duration::minutes(59);

/// Owns the OAuth credentials of a single account and hands out live access tokens.
///
/// Access tokens are minted lazily through the `refresh_token` grant; the refresh token itself
/// comes from (in order) an explicitly supplied value, the cache, or a one-time grant-code
/// exchange. With a cache configured, token generation runs under a per-token single-flight
/// guard and re-checks the cache once the guard is held, so concurrent callers sharing the
/// manager trigger a single token request. Without a cache every access-token lookup mints a
/// new token.
pub struct CredentialManager {
	http_client: Arc<dyn ApiHttpClient>,
	config: Arc<ServiceConfig>,
	client_id: String,
	client_secret: TokenSecret,
	grant_code: RwLock<Option<TokenSecret>>,
	refresh_token: RwLock<Option<TokenSecret>>,
	cache: Option<Arc<dyn TokenCache>>,
	metrics: Arc<TokenMetrics>,
	access_guard: AsyncMutex<()>,
	refresh_guard: AsyncMutex<()>,
}
impl CredentialManager {
	/// Creates a manager for the provided OAuth client.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		config: Arc<ServiceConfig>,
		http_client: Arc<dyn ApiHttpClient>,
	) -> Self {
		Self {
			http_client,
			config,
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			grant_code: RwLock::new(None),
			refresh_token: RwLock::new(None),
			cache: None,
			metrics: Default::default(),
			access_guard: AsyncMutex::new(()),
			refresh_guard: AsyncMutex::new(()),
		}
	}

	/// Attaches the token cache.
	pub fn with_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
		self.cache = Some(cache);

		self
	}

	/// Seeds the one-time grant code.
	pub fn with_grant_code(self, code: impl Into<String>) -> Self {
		self.set_grant_code(code);

		self
	}

	/// Seeds an explicit refresh token, which takes precedence over the cache.
	pub fn with_refresh_token(self, token: impl Into<String>) -> Self {
		*self.refresh_token.write() = TokenSecret::non_empty(token);

		self
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Service configuration shared with the gateway.
	pub fn config(&self) -> &Arc<ServiceConfig> {
		&self.config
	}

	/// Token request counters.
	pub fn metrics(&self) -> &Arc<TokenMetrics> {
		&self.metrics
	}

	/// Returns true when a cache is configured.
	pub fn has_cache(&self) -> bool {
		self.cache.is_some()
	}

	/// Replaces the one-time grant code used to bootstrap a refresh token.
	pub fn set_grant_code(&self, code: impl Into<String>) {
		*self.grant_code.write() = TokenSecret::non_empty(code);
	}

	/// Replaces the explicit refresh token and writes it to the cache (best effort).
	pub async fn set_refresh_token(&self, token: impl Into<String>) {
		let token = TokenSecret::non_empty(token);

		*self.refresh_token.write() = token.clone();

		if let (Some(cache), Some(token)) = (self.cache.as_deref(), token) {
			common::store_cached(cache, &self.metrics, REFRESH_TOKEN_CACHE_KEY, &token, CACHE_TTL)
				.await;
		}
	}

	/// Writes an externally obtained access token to the cache (best effort).
	pub async fn set_access_token(&self, token: impl Into<String>, expires_in: Duration) {
		if let (Some(cache), Some(token)) = (self.cache.as_deref(), TokenSecret::non_empty(token)) {
			common::store_cached(cache, &self.metrics, ACCESS_TOKEN_CACHE_KEY, &token, expires_in)
				.await;
		}
	}

	/// Builds the consent URL an operator visits to obtain a grant code.
	pub fn grant_code_consent_url(&self, redirect_uri: &str) -> Result<Url> {
		let redirect = Url::parse(redirect_uri)
			.map_err(|source| ConfigError::InvalidRedirect { source })?;

		Ok(auth::build_consent_url(&self.config, &self.client_id, Some(&redirect)))
	}

	/// Extracts the grant code from an authorization redirect URI.
	pub fn parse_grant_code_from_url(uri: &Url) -> Option<String> {
		auth::parse_grant_code_from_url(uri)
	}

	pub(crate) fn default_consent_url(&self) -> Url {
		auth::build_consent_url(&self.config, &self.client_id, self.config.redirect_uri.as_ref())
	}
}
impl Debug for CredentialManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialManager")
			.field("client_id", &self.client_id)
			.field("grant_code_set", &self.grant_code.read().is_some())
			.field("refresh_token_set", &self.refresh_token.read().is_some())
			.field("cache_configured", &self.cache.is_some())
			.finish()
	}
}
