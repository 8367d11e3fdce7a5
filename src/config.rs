//! Service configuration: endpoints, OAuth scopes, consent `state`, and transport tuning.
//!
//! [`ServiceConfig::default`] targets the public Zoho Sign deployment
//! (`accounts.zoho.com` + `sign.zoho.com`). Other data centers and test servers are reached by
//! overriding the endpoints through [`ServiceConfigBuilder`].

/// Builder API for assembling service configurations.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Authorization endpoint used to obtain grant codes.
pub const OAUTH_GRANT_URL: &str = "https://accounts.zoho.com/oauth/v2/auth";
/// Token endpoint used by both grants.
pub const OAUTH_TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";
/// Base URL of the REST API; resource paths are resolved relative to it.
pub const API_BASE_URL: &str = "https://sign.zoho.com/api/v1/";
/// Guest signing page used to build per-recipient signing links.
pub const GUEST_SIGN_URL: &str = "https://sign.zoho.com/zsguest";
/// Scopes requested during the authorization-code grant.
pub const DEFAULT_SCOPES: [&str; 3] =
	["ZohoSign.documents.all", "ZohoSign.templates.all", "ZohoSign.account.all"];
/// Opaque `state` value sent with consent and code-exchange requests.
pub const DEFAULT_STATE: &str = "zoho-sign-api";

/// Endpoint set used by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	/// OAuth authorization (consent) endpoint.
	pub authorization: Url,
	/// OAuth token endpoint.
	pub token: Url,
	/// REST API base; always ends with `/`.
	pub api_base: Url,
	/// Guest signing page.
	pub guest_sign: Url,
}

/// Immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
	/// Endpoint definitions.
	pub endpoints: ServiceEndpoints,
	/// OAuth scopes requested during the authorization-code grant.
	pub scopes: Vec<String>,
	/// `state` value sent to the authorization and token endpoints.
	pub state: String,
	/// Redirect URI embedded into consent URLs produced for missing grant codes.
	pub redirect_uri: Option<Url>,
	/// Per-request timeout applied to the default reqwest transport.
	pub timeout: Option<Duration>,
	/// `User-Agent` header applied to the default reqwest transport.
	pub user_agent: Option<String>,
}
impl ServiceConfig {
	/// Creates a new builder seeded with the public Zoho endpoints.
	pub fn builder() -> ServiceConfigBuilder {
		ServiceConfigBuilder::new()
	}

	/// Comma-joined scope list as expected by the authorization server.
	pub fn scope_string(&self) -> String {
		self.scopes.join(",")
	}

	/// Resolves a resource path (for example `templates/123`) against the API base.
	pub fn api_url(&self, path: &str) -> Result<Url> {
		self.endpoints.api_base.join(path.trim_start_matches('/')).map_err(|source| {
			crate::error::ConfigError::InvalidRequestUrl { path: path.to_owned(), source }.into()
		})
	}
}
impl Default for ServiceConfig {
	fn default() -> Self {
		ServiceConfigBuilder::new().build_unchecked()
	}
}
