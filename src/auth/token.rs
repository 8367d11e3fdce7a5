//! Token endpoint payloads for the `refresh_token` and `authorization_code` grants.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Lifetime assumed when the token endpoint omits `expires_in_sec`.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::seconds(3600);

/// Raw token endpoint response.
///
/// The endpoint answers failures with an `error` field (frequently under HTTP 200), so every
/// field is optional and the grant-specific accessors decide what is mandatory.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResponse {
	/// Newly minted access token.
	#[serde(default)]
	pub access_token: Option<TokenSecret>,
	/// Refresh token, only returned by the `authorization_code` grant.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Declared access token lifetime in seconds.
	#[serde(default)]
	pub expires_in_sec: Option<i64>,
	/// Remote error code (for example `invalid_code`).
	#[serde(default)]
	pub error: Option<String>,
}
impl TokenResponse {
	/// Decodes a token endpoint body, keeping the JSON path of any structural failure.
	pub fn parse(status: u16, body: &[u8]) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(de)
			.map_err(|source| Error::TokenResponseParse { source, status })
	}

	/// Declared lifetime, falling back to [`DEFAULT_TOKEN_LIFETIME`] for missing or
	/// non-positive values.
	pub fn lifetime(&self) -> Duration {
		self.expires_in_sec
			.filter(|secs| *secs > 0)
			.map(Duration::seconds)
			.unwrap_or(DEFAULT_TOKEN_LIFETIME)
	}

	/// Extracts the access token issued by the `refresh_token` grant.
	pub fn into_access_token(self, status: u16) -> Result<AccessTokenGrant> {
		let lifetime = self.lifetime();
		let Some(access_token) = self.access_token.filter(|secret| !secret.is_empty()) else {
			return Err(Self::failure(self.error, "access_token", status));
		};

		Ok(AccessTokenGrant { access_token, lifetime })
	}

	/// Extracts both tokens issued by the `authorization_code` grant.
	pub fn into_code_exchange(self, status: u16) -> Result<CodeExchangeGrant> {
		let lifetime = self.lifetime();
		let Some(refresh_token) = self.refresh_token.filter(|secret| !secret.is_empty()) else {
			return Err(Self::failure(self.error, "refresh_token", status));
		};
		let access_token = self.access_token.filter(|secret| !secret.is_empty());

		Ok(CodeExchangeGrant { access_token, refresh_token, lifetime })
	}

	fn failure(error: Option<String>, field: &str, status: u16) -> Error {
		let message = error
			.filter(|value| !value.is_empty())
			.unwrap_or_else(|| format!("Token endpoint response is missing {field}"));

		Error::Api { message, status: Some(status) }
	}
}

/// Result of a successful `refresh_token` grant.
#[derive(Clone, Debug)]
pub struct AccessTokenGrant {
	/// Access token secret.
	pub access_token: TokenSecret,
	/// Declared lifetime.
	pub lifetime: Duration,
}

/// Result of a successful `authorization_code` grant.
#[derive(Clone, Debug)]
pub struct CodeExchangeGrant {
	/// Access token minted alongside the refresh token, when present.
	pub access_token: Option<TokenSecret>,
	/// Long-lived refresh token.
	pub refresh_token: TokenSecret,
	/// Declared access token lifetime.
	pub lifetime: Duration,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn access_grant_uses_declared_lifetime() {
		let response = TokenResponse::parse(
			200,
			br#"{"access_token":"1000.access","api_domain":"https://www.zohoapis.com","token_type":"Bearer","expires_in_sec":1800}"#,
		)
		.expect("Token response fixture should parse.");
		let grant = response.into_access_token(200).expect("Access token should be present.");

		assert_eq!(grant.access_token.expose(), "1000.access");
		assert_eq!(grant.lifetime, Duration::seconds(1800));
	}

	#[test]
	fn missing_access_token_surfaces_remote_error() {
		let response = TokenResponse::parse(200, br#"{"error":"invalid_code"}"#)
			.expect("Error fixture should parse.");
		let err = response.into_access_token(200).expect_err("Missing token should fail.");

		assert!(matches!(
			err,
			Error::Api { ref message, status: Some(200) } if message == "invalid_code"
		));
	}

	#[test]
	fn code_exchange_requires_refresh_token() {
		let response = TokenResponse::parse(200, br#"{"access_token":"1000.access"}"#)
			.expect("Partial fixture should parse.");
		let err = response.into_code_exchange(200).expect_err("Missing refresh token should fail.");

		assert!(err.to_string().contains("refresh_token"));
	}

	#[test]
	fn non_json_body_is_a_parse_error() {
		let err = TokenResponse::parse(502, b"<html>Bad Gateway</html>")
			.expect_err("HTML bodies should not parse.");

		assert!(matches!(err, Error::TokenResponseParse { status: 502, .. }));
	}

	#[test]
	fn non_positive_lifetime_falls_back_to_default() {
		let response = TokenResponse { expires_in_sec: Some(0), ..Default::default() };

		assert_eq!(response.lifetime(), DEFAULT_TOKEN_LIFETIME);
	}
}
