//! Wrapper-level error types shared across configuration, refresh, transport, and stores.

// self
use crate::{_prelude::*, config::StorageStrategy, transport::ApiResponse};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Construction-time configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The out-of-band token refresh failed; the original request was not replayed.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
	/// Failure reported by (or classified from) the wrapped transport.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Caller-supplied request body could not be encoded.
	#[error("Request body could not be encoded as JSON.")]
	Encode {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Returns the HTTP status attached to the failure, if the server produced one.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::Transport(TransportError::Status { status, .. }) => Some(*status),
			Self::Refresh(RefreshError::Rejected { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration failures raised while building a [`WrapperConfig`](crate::config::WrapperConfig).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// The storage strategy needs named slots but a key name was not supplied.
	#[error("Storage strategy `{strategy}` requires the `{key}` key name.")]
	MissingStorageKey {
		/// Strategy that demanded the key.
		strategy: StorageStrategy,
		/// Which key name was absent (`access_token_key` or `refresh_token_key`).
		key: &'static str,
	},
	/// A required configuration string was empty.
	#[error("Configuration field `{field}` must not be empty.")]
	EmptyField {
		/// Offending field name.
		field: &'static str,
	},
}

/// Failures of the refresh-endpoint call; surfaced as the original request's result.
#[derive(Debug, ThisError)]
pub enum RefreshError {
	/// The refresh call never produced an HTTP response.
	#[error("Refresh endpoint could not be reached.")]
	Transport {
		/// Transport failure reported while calling the refresh endpoint.
		#[source]
		source: TransportError,
	},
	/// The refresh endpoint answered with a non-2xx status.
	#[error("Refresh endpoint rejected the request with HTTP {status}.")]
	Rejected {
		/// HTTP status returned by the refresh endpoint.
		status: StatusCode,
		/// Response body, decoded lossily.
		body: String,
	},
	/// The refresh endpoint returned a body that is not a JSON object.
	#[error("Refresh endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A renewed token was missing from the refresh response.
	#[error("Refresh response is missing the `{field}` string field.")]
	MissingField {
		/// Response field that was absent or not a string.
		field: String,
	},
}

/// Transport-level failures (network, URL assembly, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while dispatching the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The assembled request URL could not be parsed.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL as assembled from the base URL, version, endpoint, and path.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A header value (usually derived from a stored token) is not valid HTTP.
	#[error("Header `{name}` has an invalid value.")]
	InvalidHeader {
		/// Header that could not be set.
		name: &'static str,
		/// Underlying validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
	/// The server answered with a non-2xx status that was not recovered.
	#[error("Request failed with HTTP {status}.")]
	Status {
		/// HTTP status of the final response.
		status: StatusCode,
		/// Full response, kept for callers that inspect error payloads.
		response: Box<ApiResponse>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a non-2xx response.
	pub fn status(response: ApiResponse) -> Self {
		Self::Status { status: response.status(), response: Box::new(response) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_into_wrapper_error_with_source() {
		let store_error = StoreError::Backend { message: "disk unavailable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unavailable"));

		let source = StdError::source(&error)
			.expect("Wrapper error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn status_is_exposed_for_http_failures_only() {
		let response = ApiResponse::new(StatusCode::FORBIDDEN, HeaderMap::new(), b"nope".to_vec());
		let transport: Error = TransportError::status(response).into();
		let rejected: Error = RefreshError::Rejected {
			status: StatusCode::BAD_REQUEST,
			body: String::new(),
		}
		.into();
		let config: Error = ConfigError::EmptyField { field: "base_url" }.into();

		assert_eq!(transport.status(), Some(StatusCode::FORBIDDEN));
		assert_eq!(rejected.status(), Some(StatusCode::BAD_REQUEST));
		assert_eq!(config.status(), None);
	}

	#[test]
	fn missing_key_message_names_strategy_and_key() {
		let err = ConfigError::MissingStorageKey {
			strategy: StorageStrategy::LocalKeyValue,
			key: "refresh_token_key",
		};

		assert_eq!(
			err.to_string(),
			"Storage strategy `local_key_value` requires the `refresh_token_key` key name."
		);
	}
}
