//! Provisioner-level error types shared across the admin client, managers, and process setup.

// std
use std::path::PathBuf;
// self
use crate::_prelude::*;

/// Provisioner-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provisioner error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Desired-state blueprint failed validation.
	#[error(transparent)]
	Blueprint(#[from] crate::blueprint::BlueprintError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Request payload could not be rendered as JSON.
	#[error("Request payload could not be serialized.")]
	Payload(#[from] serde_json::Error),

	/// Backend never reported ready within the polling budget.
	#[error("Backend did not become ready after {attempts} attempts.")]
	NotReady {
		/// Number of readiness probes issued.
		attempts: u32,
	},
	/// Token endpoint rejected the administrator credentials.
	#[error("Administrator authentication failed: {reason}.")]
	Authentication {
		/// Provider- or client-supplied reason string.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// A request was attempted before [`connect`](crate::admin::AdminClient::connect) succeeded.
	#[error("Admin client is not connected.")]
	NotConnected,
	/// Admin API returned a payload without the fields the caller depends on.
	#[error("Admin API returned a malformed {resource} representation: {reason}.")]
	MalformedResponse {
		/// Resource family the payload belongs to.
		resource: &'static str,
		/// What was missing or unexpected.
		reason: String,
	},
}

/// Configuration and validation failures raised before any resource operation runs.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Server URL cannot be parsed.
	#[error("Server URL is invalid.")]
	InvalidServerUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Server URL cannot carry path segments (e.g. `mailto:`).
	#[error("Server URL `{url}` cannot be used as a base URL.")]
	NotABaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Token endpoint URL cannot be handed to the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},

	/// Required connection parameter is absent or empty.
	#[error("Missing required parameter `{name}`.")]
	MissingParameter {
		/// Parameter (environment variable) name.
		name: &'static str,
	},
	/// Mode selector is not one of `create`, `destroy`, `validate`.
	#[error("Unknown action `{action}`; expected one of create, destroy, validate.")]
	UnknownAction {
		/// Value that failed to parse.
		action: String,
	},
	/// Blueprint file could not be read.
	#[error("Blueprint file `{}` could not be read.", .path.display())]
	BlueprintRead {
		/// File that failed to load.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Blueprint file is not a valid blueprint document.
	#[error("Blueprint file is malformed at `{}`.", .source.path())]
	BlueprintParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidServerUrl { source }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the admin API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the admin API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
