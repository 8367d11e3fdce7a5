// self
use crate::{
	_prelude::*,
	config::{
		API_BASE_URL, DEFAULT_SCOPES, DEFAULT_STATE, GUEST_SIGN_URL, OAUTH_GRANT_URL,
		OAUTH_TOKEN_URL, ServiceConfig, ServiceEndpoints,
	},
};

/// Errors raised while constructing or validating a [`ServiceConfig`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigValidationError {
	/// Endpoints must use HTTP(S).
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// At least one scope must be requested.
	#[error("At least one OAuth scope must be configured.")]
	NoScopes,
	/// Scopes are comma-joined, so they cannot contain separators.
	#[error("Scope `{scope}` is empty or contains a comma or whitespace.")]
	InvalidScope {
		/// The offending scope string.
		scope: String,
	},
	/// The consent `state` cannot be blank.
	#[error("The OAuth state value cannot be empty.")]
	EmptyState,
	/// Timeouts must be positive.
	#[error("The request timeout must be positive.")]
	NonPositiveTimeout,
}

/// Builder for [`ServiceConfig`] values.
#[derive(Debug)]
pub struct ServiceConfigBuilder {
	/// OAuth authorization endpoint.
	pub authorization_endpoint: Url,
	/// OAuth token endpoint.
	pub token_endpoint: Url,
	/// REST API base URL.
	pub api_base: Url,
	/// Guest signing page.
	pub guest_sign_endpoint: Url,
	/// Scopes requested during the authorization-code grant.
	pub scopes: Vec<String>,
	/// Consent `state` value.
	pub state: String,
	/// Redirect URI embedded into generated consent URLs.
	pub redirect_uri: Option<Url>,
	/// Transport timeout.
	pub timeout: Option<Duration>,
	/// Transport `User-Agent`.
	pub user_agent: Option<String>,
}
impl ServiceConfigBuilder {
	/// Creates a new builder seeded with the public Zoho endpoints and default scopes.
	pub fn new() -> Self {
		Self {
			authorization_endpoint: fixed_url(OAUTH_GRANT_URL),
			token_endpoint: fixed_url(OAUTH_TOKEN_URL),
			api_base: fixed_url(API_BASE_URL),
			guest_sign_endpoint: fixed_url(GUEST_SIGN_URL),
			scopes: DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect(),
			state: DEFAULT_STATE.to_owned(),
			redirect_uri: None,
			timeout: None,
			user_agent: None,
		}
	}

	/// Sets the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = url;

		self
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = url;

		self
	}

	/// Sets the REST API base URL. A trailing `/` is added when missing.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = url;

		self
	}

	/// Sets the guest signing page.
	pub fn guest_sign_endpoint(mut self, url: Url) -> Self {
		self.guest_sign_endpoint = url;

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the consent `state` value.
	pub fn state(mut self, state: impl Into<String>) -> Self {
		self.state = state.into();

		self
	}

	/// Sets the redirect URI embedded into consent URLs.
	pub fn redirect_uri(mut self, url: Url) -> Self {
		self.redirect_uri = Some(url);

		self
	}

	/// Sets the per-request timeout of the default transport.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Sets the `User-Agent` of the default transport.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ServiceConfig, ConfigValidationError> {
		let config = self.build_unchecked();

		config.validate()?;

		Ok(config)
	}

	pub(crate) fn build_unchecked(self) -> ServiceConfig {
		let mut api_base = self.api_base;

		if !api_base.path().ends_with('/') {
			let path = format!("{}/", api_base.path());

			api_base.set_path(&path);
		}

		ServiceConfig {
			endpoints: ServiceEndpoints {
				authorization: self.authorization_endpoint,
				token: self.token_endpoint,
				api_base,
				guest_sign: self.guest_sign_endpoint,
			},
			scopes: self.scopes,
			state: self.state,
			redirect_uri: self.redirect_uri,
			timeout: self.timeout,
			user_agent: self.user_agent,
		}
	}
}
impl Default for ServiceConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ServiceConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ConfigValidationError> {
		validate_endpoint("authorization", &self.endpoints.authorization)?;
		validate_endpoint("token", &self.endpoints.token)?;
		validate_endpoint("api", &self.endpoints.api_base)?;
		validate_endpoint("guest sign", &self.endpoints.guest_sign)?;

		if self.scopes.is_empty() {
			return Err(ConfigValidationError::NoScopes);
		}
		if let Some(scope) = self.scopes.iter().find(|scope| !is_valid_scope(scope)) {
			return Err(ConfigValidationError::InvalidScope { scope: scope.clone() });
		}
		if self.state.trim().is_empty() {
			return Err(ConfigValidationError::EmptyState);
		}
		if self.timeout.is_some_and(|timeout| !timeout.is_positive()) {
			return Err(ConfigValidationError::NonPositiveTimeout);
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigValidationError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ =>
			Err(ConfigValidationError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}

fn is_valid_scope(scope: &str) -> bool {
	!scope.is_empty() && !scope.chars().any(|c| c == ',' || c.is_whitespace())
}

fn fixed_url(value: &'static str) -> Url {
	Url::parse(value).expect("Built-in endpoint constants are valid URLs.")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse URL fixture.")
	}

	#[test]
	fn api_base_gains_trailing_slash() {
		let config = ServiceConfig::builder()
			.api_base(url("https://sign.zoho.eu/api/v1"))
			.build()
			.expect("EU API base should be accepted.");

		assert_eq!(config.endpoints.api_base.as_str(), "https://sign.zoho.eu/api/v1/");
		assert_eq!(
			config.api_url("templates").expect("Path should resolve.").as_str(),
			"https://sign.zoho.eu/api/v1/templates"
		);
	}

	#[test]
	fn rejects_non_http_endpoints() {
		let err = ServiceConfig::builder()
			.token_endpoint(url("ftp://accounts.zoho.com/oauth/v2/token"))
			.build()
			.expect_err("FTP endpoints should be rejected.");

		assert!(matches!(err, ConfigValidationError::UnsupportedScheme { endpoint: "token", .. }));
	}

	#[test]
	fn rejects_bad_scopes_and_state() {
		let err = ServiceConfig::builder()
			.scopes(Vec::<String>::new())
			.build()
			.expect_err("Empty scopes should be rejected.");

		assert_eq!(err, ConfigValidationError::NoScopes);

		let err = ServiceConfig::builder()
			.scopes(["ZohoSign.documents.all", "ZohoSign.templates.all,extra"])
			.build()
			.expect_err("Comma-separated scope entries should be rejected.");

		assert!(matches!(err, ConfigValidationError::InvalidScope { .. }));

		let err = ServiceConfig::builder()
			.state("  ")
			.build()
			.expect_err("Blank state should be rejected.");

		assert_eq!(err, ConfigValidationError::EmptyState);
	}

	#[test]
	fn rejects_non_positive_timeout() {
		let err = ServiceConfig::builder()
			.timeout(Duration::ZERO)
			.build()
			.expect_err("Zero timeouts should be rejected.");

		assert_eq!(err, ConfigValidationError::NonPositiveTimeout);
	}
}
