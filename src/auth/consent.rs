//! Authorization (consent) URL construction and grant-code extraction from redirect URIs.

// self
use crate::{_prelude::*, config::ServiceConfig};

/// Builds the authorization URL an operator visits to mint a one-time grant code.
///
/// The URL always requests `access_type=offline` so the exchange yields a refresh token, and
/// carries the configured scope list joined with commas.
pub fn build_consent_url(
	config: &ServiceConfig,
	client_id: &str,
	redirect_uri: Option<&Url>,
) -> Url {
	let mut url = config.endpoints.authorization.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", client_id);
	pairs.append_pair("state", &config.state);

	if let Some(redirect) = redirect_uri {
		pairs.append_pair("redirect_uri", redirect.as_str());
	}

	pairs.append_pair("response_type", "code");
	pairs.append_pair("access_type", "offline");
	pairs.append_pair("scope", &config.scope_string());

	drop(pairs);

	url
}

/// Extracts the `code` query parameter from an authorization redirect URI.
///
/// Returns `None` when the parameter is absent or blank.
pub fn parse_grant_code_from_url(uri: &Url) -> Option<String> {
	uri.query_pairs()
		.find(|(key, _)| key == "code")
		.map(|(_, value)| value.into_owned())
		.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn consent_url_carries_offline_access_and_scopes() {
		let config = ServiceConfig::default();
		let redirect = Url::parse("https://app.example.com/zoho/callback")
			.expect("Redirect URI should parse.");
		let url = build_consent_url(&config, "1000.CLIENT", Some(&redirect));
		let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();

		assert!(url.as_str().starts_with("https://accounts.zoho.com/oauth/v2/auth?"));
		assert_eq!(pairs.get("client_id"), Some(&"1000.CLIENT".into()));
		assert_eq!(pairs.get("redirect_uri"), Some(&redirect.as_str().into()));
		assert_eq!(pairs.get("response_type"), Some(&"code".into()));
		assert_eq!(pairs.get("access_type"), Some(&"offline".into()));
		assert_eq!(
			pairs.get("scope"),
			Some(&"ZohoSign.documents.all,ZohoSign.templates.all,ZohoSign.account.all".into())
		);
		assert!(pairs.contains_key("state"));
	}

	#[test]
	fn consent_url_omits_missing_redirect() {
		let url = build_consent_url(&ServiceConfig::default(), "1000.CLIENT", None);

		assert!(url.query_pairs().all(|(key, _)| key != "redirect_uri"));
	}

	#[test]
	fn grant_code_is_read_from_redirect_query() {
		let uri = Url::parse(
			"https://app.example.com/zoho/callback?state=abc&code=1000.grant&location=us",
		)
		.expect("Redirect URI fixture should parse.");

		assert_eq!(parse_grant_code_from_url(&uri), Some("1000.grant".into()));
	}

	#[test]
	fn missing_or_blank_grant_code_is_none() {
		let without = Url::parse("https://app.example.com/cb?state=abc")
			.expect("Redirect URI fixture should parse.");
		let blank = Url::parse("https://app.example.com/cb?code=")
			.expect("Redirect URI fixture should parse.");

		assert_eq!(parse_grant_code_from_url(&without), None);
		assert_eq!(parse_grant_code_from_url(&blank), None);
	}
}
