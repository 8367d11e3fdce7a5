//! Authenticated REST gateway: request assembly, the response envelope policy, and list calls.
//!
//! Every call resolves a live access token through the [`CredentialManager`] and sends it as
//! `Authorization: Zoho-oauthtoken <token>`. Mutating calls (`POST`/`PUT`) carry their JSON body
//! as the `data` form field. Responses follow a two-tier success signal: the HTTP status and an
//! application-level `code` field, where only `code == 0` counts as success.

pub mod page;

pub use page::*;

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::CredentialManager,
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpMethod},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Decoded result of a successful call.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiPayload {
	/// JSON object envelope with `code == 0`.
	Json(JsonMap<String, JsonValue>),
	/// Body that was not a JSON document (for example a PDF), returned untouched.
	Raw(Vec<u8>),
}
impl ApiPayload {
	/// Returns the JSON envelope, if any.
	pub fn as_json(&self) -> Option<&JsonMap<String, JsonValue>> {
		match self {
			ApiPayload::Json(map) => Some(map),
			ApiPayload::Raw(_) => None,
		}
	}

	/// Consumes the payload, returning the JSON envelope or an error for raw bodies.
	pub fn into_json(self) -> Result<JsonMap<String, JsonValue>> {
		match self {
			ApiPayload::Json(map) => Ok(map),
			ApiPayload::Raw(_) => Err(Error::unexpected_payload("expected a JSON envelope")),
		}
	}

	/// Returns true for raw payloads.
	pub fn is_raw(&self) -> bool {
		matches!(self, ApiPayload::Raw(_))
	}
}

/// Issues authenticated calls against the REST base URL.
#[derive(Clone)]
pub struct Gateway {
	http_client: Arc<dyn ApiHttpClient>,
	credentials: Arc<CredentialManager>,
}
impl Gateway {
	/// Creates a gateway sharing `credentials` and `http_client`.
	pub fn new(http_client: Arc<dyn ApiHttpClient>, credentials: Arc<CredentialManager>) -> Self {
		Self { http_client, credentials }
	}

	/// Credential manager backing this gateway.
	pub fn credentials(&self) -> &Arc<CredentialManager> {
		&self.credentials
	}

	/// Sends a request to `path` (relative to the REST base) and returns the raw response.
	///
	/// `query` pairs are appended to the URL. For `POST`/`PUT`, `body` (default `{}`) is sent as
	/// the JSON-encoded `data` form field followed by `extra_form`; other methods send no body.
	pub async fn call(
		&self,
		path: &str,
		method: HttpMethod,
		query: &[(String, String)],
		body: Option<&JsonValue>,
		extra_form: &[(String, String)],
	) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Api;

		let span = FlowSpan::new(KIND, method.as_str());

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut url = self.credentials.config().api_url(path)?;

				if !query.is_empty() {
					url.query_pairs_mut().extend_pairs(query);
				}

				let token = self.credentials.access_token().await?;
				let mut request = ApiRequest::new(method, url).with_authorization(
					TokenSecret::new(format!("Zoho-oauthtoken {}", token.expose())),
				);

				if method.sends_form() {
					let data = match body {
						Some(body) => body.to_string(),
						None => "{}".into(),
					};

					request = request.with_form_field("data", data);

					for (key, value) in extra_form {
						request = request.with_form_field(key.as_str(), value.as_str());
					}
				}

				Ok(self.http_client.execute(request).await?)
			})
			.await;

		obs::record_flow_result(KIND, &result);

		result
	}

	/// Applies the response envelope policy.
	///
	/// A body that does not decode to a non-empty JSON value is returned as
	/// [`ApiPayload::Raw`] under any 2xx status, without checking its content type. Decoded
	/// objects succeed only with `code == 0` (number or numeric string); everything else is an
	/// [`Error::Api`] carrying the remote `message`.
	pub fn process_result(response: &ApiResponse) -> Result<ApiPayload> {
		let decoded = serde_json::from_slice::<JsonValue>(&response.body)
			.ok()
			.filter(|value| !is_blank(value));
		let message = match decoded {
			Some(JsonValue::Object(map)) => {
				if map.get("code").is_some_and(is_zero_code) {
					return Ok(ApiPayload::Json(map));
				}

				map.get("message").map(message_text).unwrap_or_default()
			},
			Some(_) => String::new(),
			None if response.is_success() => {
				obs::raw_payload(
					response.status,
					response.content_type.as_deref(),
					response.body.len(),
				);

				return Ok(ApiPayload::Raw(response.body.clone()));
			},
			None => format!("Internal API error: {} {}", response.status, response.reason_phrase())
				.trim_end()
				.to_owned(),
		};

		Err(Error::remote(message, Some(response.status)))
	}

	/// Fetches a list page; the decoded envelope is returned without checking `code`.
	pub async fn get_list(
		&self,
		path: &str,
		page: &PageContext,
	) -> Result<JsonMap<String, JsonValue>> {
		let query = [("data".to_owned(), page.to_query_value())];
		let response = self.call(path, HttpMethod::Get, &query, None, &[]).await?;

		if let Ok(JsonValue::Object(map)) = serde_json::from_slice(&response.body) {
			return Ok(map);
		}

		match Self::process_result(&response)? {
			ApiPayload::Json(map) => Ok(map),
			ApiPayload::Raw(_) => Err(Error::unexpected_payload(format!(
				"list `{path}` did not return a JSON object"
			))),
		}
	}

	/// `GET` followed by [`Gateway::process_result`].
	pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<ApiPayload> {
		let response = self.call(path, HttpMethod::Get, query, None, &[]).await?;

		Self::process_result(&response)
	}

	/// `POST` followed by [`Gateway::process_result`].
	pub async fn post(
		&self,
		path: &str,
		body: Option<&JsonValue>,
		extra_form: &[(String, String)],
	) -> Result<ApiPayload> {
		let response = self.call(path, HttpMethod::Post, &[], body, extra_form).await?;

		Self::process_result(&response)
	}

	/// `PUT` followed by [`Gateway::process_result`].
	pub async fn put(
		&self,
		path: &str,
		body: Option<&JsonValue>,
		extra_form: &[(String, String)],
	) -> Result<ApiPayload> {
		let response = self.call(path, HttpMethod::Put, &[], body, extra_form).await?;

		Self::process_result(&response)
	}

	/// `DELETE` followed by [`Gateway::process_result`].
	pub async fn delete(&self, path: &str) -> Result<ApiPayload> {
		let response = self.call(path, HttpMethod::Delete, &[], None, &[]).await?;

		Self::process_result(&response)
	}

	/// Downloads a binary document, returning the body bytes on success.
	pub async fn fetch_binary(&self, path: &str) -> Result<Vec<u8>> {
		let response = self.call(path, HttpMethod::Get, &[], None, &[]).await?;

		Self::process_result(&response)?;

		Ok(response.body)
	}
}
impl Debug for Gateway {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").field("credentials", &self.credentials).finish()
	}
}

// Loose emptiness check: null, false, zero, "", "0", and empty containers.
fn is_blank(value: &JsonValue) -> bool {
	match value {
		JsonValue::Null => true,
		JsonValue::Bool(flag) => !flag,
		JsonValue::Number(number) => number.as_f64() == Some(0.0),
		JsonValue::String(text) => text.is_empty() || text == "0",
		JsonValue::Array(items) => items.is_empty(),
		JsonValue::Object(map) => map.is_empty(),
	}
}

fn is_zero_code(code: &JsonValue) -> bool {
	match code {
		JsonValue::Number(number) => number.as_f64() == Some(0.0),
		JsonValue::String(text) => text.trim().parse::<f64>().is_ok_and(|value| value == 0.0),
		JsonValue::Bool(flag) => !flag,
		_ => false,
	}
}

fn message_text(message: &JsonValue) -> String {
	match message {
		JsonValue::String(text) => text.clone(),
		JsonValue::Null => String::new(),
		other => other.to_string(),
	}
}
