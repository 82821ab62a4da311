//! Connector-level error types shared across configuration and the exchange pipeline.

// self
use crate::_prelude::*;

/// Connector-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical connector error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A vendor exchange step failed; the callback aborts and no identity is produced.
	#[error("Vendor {step} step failed.")]
	Exchange {
		/// Pipeline step that failed.
		step: ExchangeStep,
		/// Underlying exchange failure.
		#[source]
		source: ExchangeError,
	},
	/// Callback request carried no `code` query parameter.
	#[error("Callback request is missing the `code` query parameter.")]
	MissingAuthorizationCode,
	/// Connector session data could not be serialized for offline access.
	#[error("Connector session data could not be serialized.")]
	SessionDataEncode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Wraps a step failure with the step label surfaced to the host.
	pub fn exchange(step: ExchangeStep, source: ExchangeError) -> Self {
		Self::Exchange { step, source }
	}

	/// Returns which exchange step failed, when the error came from the vendor pipeline.
	pub fn failed_step(&self) -> Option<ExchangeStep> {
		match self {
			Self::Exchange { step, .. } => Some(*step),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised at connector open time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured endpoint URI cannot be parsed.
	#[error("Configured `{field}` is not a valid URI.")]
	InvalidEndpoint {
		/// Configuration field holding the malformed URI.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required configuration field is empty.
	#[error("Configured `{field}` must not be empty.")]
	MissingField {
		/// Name of the empty configuration field.
		field: &'static str,
	},
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

/// Failure modes shared by the three vendor exchanges.
///
/// Transport success and application-level success are distinct dimensions; a payload with a
/// non-zero `errcode` is a remote failure even when the HTTP status was 200.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Vendor answered with a non-200 HTTP status.
	#[error("Vendor endpoint returned HTTP {status}: {body}.")]
	RemoteStatus {
		/// HTTP status code returned by the vendor.
		status: u16,
		/// Response body text, surfaced for diagnostics.
		body: String,
	},
	/// HTTP 200, but the vendor payload carried a non-zero `errcode`.
	#[error("Vendor rejected the request: errcode {code}, {message}.")]
	RemoteApplication {
		/// Vendor application-level error code.
		code: i64,
		/// Vendor-supplied error message.
		message: String,
	},
	/// Vendor payload is not valid JSON for the expected shape.
	#[error("Vendor endpoint returned malformed JSON.")]
	Decode {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the vendor endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the vendor endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Labels for the three dependent vendor exchange steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeStep {
	/// Corp credentials exchanged for an access credential.
	TokenExchange,
	/// One-time login code resolved to a vendor user identifier.
	UserIdExchange,
	/// Vendor user identifier resolved to a directory record.
	ProfileFetch,
}
impl ExchangeStep {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeStep::TokenExchange => "token_exchange",
			ExchangeStep::UserIdExchange => "user_id_exchange",
			ExchangeStep::ProfileFetch => "profile_fetch",
		}
	}
}
impl Display for ExchangeStep {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn exchange_errors_name_the_failing_step() {
		let err = Error::exchange(
			ExchangeStep::UserIdExchange,
			ExchangeError::RemoteApplication { code: 40029, message: "invalid code".into() },
		);

		assert_eq!(err.failed_step(), Some(ExchangeStep::UserIdExchange));
		assert!(err.to_string().contains("user_id_exchange"));

		let source = StdError::source(&err)
			.expect("Exchange errors should expose the step failure as their source.");

		assert!(source.to_string().contains("40029"));
	}

	#[test]
	fn config_errors_name_the_offending_field() {
		let err = ConfigError::MissingField { field: "corpId" };

		assert!(err.to_string().contains("corpId"));
		assert!(Error::from(err).failed_step().is_none());
	}
}
