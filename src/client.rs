//! Entry point tying credentials, the gateway, and resource modules together.

// self
use crate::{
	_prelude::*,
	api::{Requests, Templates},
	cache::TokenCache,
	config::ServiceConfig,
	flows::CredentialManager,
	gateway::Gateway,
	http::ApiHttpClient,
	resource::{ResourceDescriptor, ResourceModule, ResourceRegistry},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Zoho Sign API client.
///
/// Modules handed out by the client share one gateway, so they also share the credential
/// manager and its token cache.
#[derive(Clone, Debug)]
pub struct ZohoSign {
	gateway: Arc<Gateway>,
	registry: ResourceRegistry,
}
impl ZohoSign {
	/// Starts building a client for the OAuth client `client_id`.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> ZohoSignBuilder {
		ZohoSignBuilder::new(client_id, client_secret)
	}

	/// Creates a client with the default configuration and reqwest transport.
	#[cfg(feature = "reqwest")]
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
		Self::builder(client_id, client_secret).build()
	}

	/// Credential manager shared by every module.
	pub fn credentials(&self) -> &Arc<CredentialManager> {
		self.gateway.credentials()
	}

	/// Gateway shared by every module.
	pub fn gateway(&self) -> &Arc<Gateway> {
		&self.gateway
	}

	/// Registered resources.
	pub fn registry(&self) -> &ResourceRegistry {
		&self.registry
	}

	/// The `templates` module.
	pub fn templates(&self) -> Templates {
		Templates::new(self.builtin("templates"))
	}

	/// The `requests` module.
	pub fn requests(&self) -> Requests {
		Requests::new(self.builtin("requests"))
	}

	/// Returns the module registered under `name` (singular or plural, any case).
	pub fn module(&self, name: &str) -> Result<ResourceModule> {
		let descriptor = self
			.registry
			.get(name)
			.ok_or_else(|| Error::UnknownResource { name: name.to_owned() })?;

		Ok(ResourceModule::new(self.gateway.clone(), descriptor.clone()))
	}

	/// Replaces the one-time grant code.
	pub fn set_grant_code(&self, code: impl Into<String>) {
		self.credentials().set_grant_code(code);
	}

	/// Replaces the refresh token and writes it to the cache.
	pub async fn set_refresh_token(&self, token: impl Into<String>) {
		self.credentials().set_refresh_token(token).await;
	}

	/// Consent URL an operator visits to obtain a grant code.
	pub fn grant_code_consent_url(&self, redirect_uri: &str) -> Result<Url> {
		self.credentials().grant_code_consent_url(redirect_uri)
	}

	/// Extracts the grant code from an authorization redirect URI.
	pub fn parse_grant_code_from_url(uri: &Url) -> Option<String> {
		CredentialManager::parse_grant_code_from_url(uri)
	}

	// Built-in resources are registered by every builder; a caller-supplied descriptor under the
	// same name still wins.
	fn builtin(&self, name: &str) -> ResourceModule {
		let descriptor = self
			.registry
			.get(name)
			.cloned()
			.unwrap_or_else(|| Arc::new(ResourceDescriptor::new(name)));

		ResourceModule::new(self.gateway.clone(), descriptor)
	}
}

/// Builder for [`ZohoSign`].
pub struct ZohoSignBuilder {
	client_id: String,
	client_secret: String,
	config: ServiceConfig,
	http_client: Option<Arc<dyn ApiHttpClient>>,
	cache: Option<Arc<dyn TokenCache>>,
	grant_code: Option<String>,
	refresh_token: Option<String>,
	registry: ResourceRegistry,
}
impl ZohoSignBuilder {
	/// Creates a builder with the default configuration and built-in resources.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			config: ServiceConfig::default(),
			http_client: None,
			cache: None,
			grant_code: None,
			refresh_token: None,
			registry: ResourceRegistry::default(),
		}
	}

	/// Replaces the service configuration.
	pub fn config(mut self, config: ServiceConfig) -> Self {
		self.config = config;

		self
	}

	/// Uses `http_client` instead of the default reqwest transport.
	pub fn http_client(mut self, http_client: impl ApiHttpClient) -> Self {
		self.http_client = Some(Arc::new(http_client));

		self
	}

	/// Uses an already shared transport.
	pub fn shared_http_client(mut self, http_client: Arc<dyn ApiHttpClient>) -> Self {
		self.http_client = Some(http_client);

		self
	}

	/// Caches tokens in `cache`.
	pub fn cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
		self.cache = Some(cache);

		self
	}

	/// One-time grant code used when no refresh token is available.
	pub fn grant_code(mut self, code: impl Into<String>) -> Self {
		self.grant_code = Some(code.into());

		self
	}

	/// Explicit refresh token; takes precedence over the cache.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(token.into());

		self
	}

	/// Registers an additional resource.
	pub fn resource(mut self, descriptor: ResourceDescriptor) -> Self {
		self.registry.register(descriptor);

		self
	}

	/// Builds the client.
	pub fn build(self) -> Result<ZohoSign> {
		let http_client = match self.http_client {
			Some(http_client) => http_client,
			None => Self::default_http_client(&self.config)?,
		};
		let mut credentials = CredentialManager::new(
			self.client_id,
			self.client_secret,
			Arc::new(self.config),
			http_client.clone(),
		);

		if let Some(cache) = self.cache {
			credentials = credentials.with_cache(cache);
		}
		if let Some(code) = self.grant_code {
			credentials = credentials.with_grant_code(code);
		}
		if let Some(token) = self.refresh_token {
			credentials = credentials.with_refresh_token(token);
		}

		let gateway = Arc::new(Gateway::new(http_client, Arc::new(credentials)));

		Ok(ZohoSign { gateway, registry: self.registry })
	}

	#[cfg(feature = "reqwest")]
	fn default_http_client(config: &ServiceConfig) -> Result<Arc<dyn ApiHttpClient>> {
		Ok(Arc::new(ReqwestHttpClient::from_config(config)?))
	}

	#[cfg(not(feature = "reqwest"))]
	fn default_http_client(_: &ServiceConfig) -> Result<Arc<dyn ApiHttpClient>> {
		Err(crate::error::ConfigError::MissingHttpClient.into())
	}
}
impl Debug for ZohoSignBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ZohoSignBuilder")
			.field("client_id", &self.client_id)
			.field("config", &self.config)
			.field("http_client_set", &self.http_client.is_some())
			.field("cache_set", &self.cache.is_some())
			.field("grant_code_set", &self.grant_code.is_some())
			.field("refresh_token_set", &self.refresh_token.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::TransportError, http::{ApiRequest, HttpFuture}};

	struct OfflineTransport;
	impl ApiHttpClient for OfflineTransport {
		fn execute(&self, _: ApiRequest) -> HttpFuture<'_> {
			Box::pin(async { Err(TransportError::Io(std::io::Error::other("offline"))) })
		}
	}

	fn client() -> ZohoSign {
		ZohoSign::builder("1000.CLIENT", "secret")
			.http_client(OfflineTransport)
			.resource(ResourceDescriptor::new("Folder"))
			.build()
			.expect("Client should build with an explicit transport.")
	}

	#[test]
	fn modules_resolve_by_any_name_form() {
		let client = client();

		for name in ["templates", "Template", "requests", "folders"] {
			assert!(client.module(name).is_ok(), "Module `{name}` should resolve.");
		}

		assert_eq!(client.templates().descriptor().url_path(), "templates");
		assert_eq!(client.requests().descriptor().identity_key(), "request_id");
	}

	#[test]
	fn unknown_modules_are_rejected() {
		let err = client().module("invoices").expect_err("Unregistered modules should fail.");

		assert!(matches!(err, Error::UnknownResource { ref name } if name == "invoices"));
	}

	#[test]
	fn consent_url_uses_the_client_id() {
		let url = client()
			.grant_code_consent_url("https://app.example.com/callback")
			.expect("Consent URL should build.");

		assert!(url.query_pairs().any(|(key, value)| key == "client_id" && value == "1000.CLIENT"));
	}
}
