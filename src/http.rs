//! Transport primitives for vendor directory exchanges.
//!
//! [`VendorHttpClient`] is the crate's only dependency on an HTTP stack. The vendor's
//! exchange endpoints answer plain GET requests, so the trait surface is a single call that
//! returns the full response regardless of status; classifying non-200 statuses and decoding
//! bodies belongs to the API client layer.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`VendorHttpClient::get`].
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Raw response captured from a vendor endpoint.
///
/// Status and body travel together because transport success and application-level success
/// are distinct dimensions; the API client checks both.
#[derive(Clone, Debug)]
pub struct VendorResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl VendorResponse {
	/// Lossy UTF-8 view of the body, used when reporting non-200 responses.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Abstraction over HTTP transports capable of executing the vendor's GET exchanges.
///
/// Implementations must be `Send + Sync + 'static` so one connector instance can serve
/// concurrent callback invocations, and the returned future must own whatever state it needs
/// so no mutable transport state is shared between logins. Implementations must read the
/// body to completion on every path, including error statuses, so the underlying connection
/// is always released back to the pool.
pub trait VendorHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Issues a GET request and returns the full response on any HTTP status.
	///
	/// A non-200 status is a successful transport result; only network-level failures map to
	/// [`TransportError`].
	fn get(&self, url: Url) -> HttpFuture<'_, VendorResponse>;
}
impl<C> VendorHttpClient for Arc<C>
where
	C: ?Sized + VendorHttpClient,
{
	fn get(&self, url: Url) -> HttpFuture<'_, VendorResponse> {
		(**self).get(url)
	}
}

#[cfg(feature = "reqwest")]
/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The vendor endpoints return exchange results directly, so [`ReqwestHttpClient::bounded`]
/// disables redirect following and bounds every request with a timeout; a hanging vendor
/// endpoint must not stall the host's callback handler indefinitely. Custom clients passed
/// through [`ReqwestHttpClient::with_client`] own their own timeout policy.
#[derive(Clone)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Outbound request timeout applied by [`ReqwestHttpClient::bounded`].
	pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

	/// Builds the default hardened client: bounded timeout, redirect following disabled.
	pub fn bounded() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(Self::REQUEST_TIMEOUT)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
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
impl VendorHttpClient for ReqwestHttpClient {
	fn get(&self, url: Url) -> HttpFuture<'_, VendorResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.get(url).send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(VendorResponse { status, body })
		})
	}
}
