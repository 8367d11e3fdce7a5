//! Transport primitives for token exchanges and REST calls.
//!
//! [`ApiHttpClient`] is the client's only dependency on an HTTP stack. The credential manager
//! and the gateway build fully-resolved [`ApiRequest`] values (URL with query string, optional
//! `Authorization` value, optional form body) and hand them to the transport, which returns the
//! status line and raw body as an [`ApiResponse`]. Interpreting the body is left to the caller
//! so binary downloads and JSON envelopes travel through the same path.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ServiceConfig, error::ConfigError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API and token requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by the
/// credential manager and the gateway behind an `Arc`.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves once the full response body has been read.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}

	/// Returns true for methods that carry the `data` form body.
	pub const fn sends_form(self) -> bool {
		matches!(self, HttpMethod::Post | HttpMethod::Put)
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully-resolved outbound request.
#[derive(Clone)]
pub struct ApiRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute URL, query string included.
	pub url: Url,
	/// Complete `Authorization` header value, if any.
	pub authorization: Option<TokenSecret>,
	/// Form fields sent as `application/x-www-form-urlencoded`; empty means no body.
	pub form: Vec<(String, String)>,
}
impl ApiRequest {
	/// Creates a request without credentials or body.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, authorization: None, form: Vec::new() }
	}

	/// Attaches the `Authorization` header value.
	pub fn with_authorization(mut self, value: TokenSecret) -> Self {
		self.authorization = Some(value);

		self
	}

	/// Appends a form field.
	pub fn with_form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.form.push((key.into(), value.into()));

		self
	}

	/// Returns the value of the first form field named `key`.
	pub fn form_value(&self, key: &str) -> Option<&str> {
		self.form.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
	}

	/// URL without its query string, safe to log.
	pub fn endpoint(&self) -> String {
		let mut url = self.url.clone();

		url.set_query(None);

		url.to_string()
	}
}
impl Debug for ApiRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let fields: Vec<&str> = self.form.iter().map(|(key, _)| key.as_str()).collect();

		f.debug_struct("ApiRequest")
			.field("method", &self.method)
			.field("endpoint", &self.endpoint())
			.field("authorization", &self.authorization)
			.field("form_fields", &fields)
			.finish()
	}
}

/// Raw response returned by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Reason phrase for the status, when known.
	pub reason: Option<String>,
	/// `Content-Type` header, when present.
	pub content_type: Option<String>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, reason: None, content_type: None, body: body.into() }
	}

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..=299).contains(&self.status)
	}

	/// Reason phrase, or an empty string when the transport did not supply one.
	pub fn reason_phrase(&self) -> &str {
		self.reason.as_deref().unwrap_or("")
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the timeout and `User-Agent` in `config`.
	pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.timeout {
			let timeout = std::time::Duration::try_from(timeout)
				.map_err(ConfigError::http_client_build)?;

			builder = builder.timeout(timeout);
		}

		let user_agent = config
			.user_agent
			.clone()
			.unwrap_or_else(|| format!("zoho-sign-api-rust/{}", env!("CARGO_PKG_VERSION")));

		Ok(Self(builder.user_agent(user_agent).build()?))
	}

	fn method(method: HttpMethod) -> reqwest::Method {
		match method {
			HttpMethod::Get => reqwest::Method::GET,
			HttpMethod::Post => reqwest::Method::POST,
			HttpMethod::Put => reqwest::Method::PUT,
			HttpMethod::Delete => reqwest::Method::DELETE,
		}
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let endpoint = request.endpoint();
			let mut builder = self.0.request(Self::method(request.method), request.url);

			if let Some(authorization) = &request.authorization {
				builder = builder.header(reqwest::header::AUTHORIZATION, authorization.expose());
			}
			if !request.form.is_empty() {
				builder = builder.form(&request.form);
			}

			let response =
				builder.send().await.map_err(|e| TransportError::network(&endpoint, e))?;
			let status = response.status();
			let content_type = response
				.headers()
				.get(reqwest::header::CONTENT_TYPE)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);
			let body =
				response.bytes().await.map_err(|e| TransportError::network(&endpoint, e))?;

			Ok(ApiResponse {
				status: status.as_u16(),
				reason: status.canonical_reason().map(str::to_owned),
				content_type,
				body: body.to_vec(),
			})
		})
	}
}
