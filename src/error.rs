//! Client-level error types shared across the credential manager, gateway, and resource modules.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A refresh token was required but no grant code has been supplied.
	#[error(
		"A grant code is required to use the API. To generate a grant code visit {consent_url}."
	)]
	GrantCodeMissing {
		/// Ready-to-use consent URL that yields a fresh grant code.
		consent_url: String,
	},
	/// The remote service reported a failure.
	#[error("{message}")]
	Api {
		/// Remote-reported (or synthesized) failure message.
		message: String,
		/// HTTP status code, when the failure came from an HTTP response.
		status: Option<u16>,
	},
	/// Token endpoint responded with a body that is not valid JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the token response.
		status: u16,
	},
	/// A successful response did not have the expected shape.
	#[error("Response payload is not usable: {reason}.")]
	UnexpectedPayload {
		/// What was missing or malformed.
		reason: String,
	},
	/// The identity attribute of an entity cannot be rewritten.
	#[error("Attribute `{key}` identifies the record and cannot be modified.")]
	ImmutableIdentity {
		/// Identity attribute name.
		key: String,
	},
	/// A record-level operation was invoked on an entity that has not been created yet.
	#[error("The {kind} record has not been created yet.")]
	EntityNotPersisted {
		/// Singular resource name of the entity.
		kind: String,
	},
	/// No resource descriptor is registered under the requested name.
	#[error("No resource named `{name}` is registered.")]
	UnknownResource {
		/// Requested resource name.
		name: String,
	},
}
impl Error {
	/// Builds an [`Error::Api`] for a failure reported by a Zoho response envelope.
	pub fn remote(message: impl Display, status: Option<u16>) -> Self {
		Self::Api {
			message: format!("Response from Zoho is not success. Message: {message}"),
			status,
		}
	}

	/// Builds an [`Error::UnexpectedPayload`].
	pub fn unexpected_payload(reason: impl Into<String>) -> Self {
		Self::UnexpectedPayload { reason: reason.into() }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A request URL could not be derived from the configured endpoints.
	#[error("Request URL `{path}` is invalid.")]
	InvalidRequestUrl {
		/// Relative path that failed to resolve.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// No HTTP client was supplied and no default transport is compiled in.
	#[error("No HTTP client is configured; enable the `reqwest` feature or supply one.")]
	MissingHttpClient,
	/// Service configuration failed validation.
	#[error(transparent)]
	InvalidConfig(#[from] crate::config::ConfigValidationError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Endpoint (without query string) that was being called.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during an HTTP exchange.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}
}
