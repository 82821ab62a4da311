//! Connector facade: login URL construction and callback handling.
//!
//! [`WecomConnector`] implements the two capabilities a callback-style connector owes the
//! host provider: producing the authorization redirect URL and turning the vendor's callback
//! into a canonical identity. Each callback runs the three dependent exchanges strictly
//! sequentially and aborts on the first failure; no partial identity is ever returned.

// self
use crate::{
	_prelude::*,
	api::VendorApiClient,
	config::{ConnectorConfig, ConnectorEndpoints},
	error::{ExchangeError, ExchangeStep},
	http::VendorHttpClient,
	identity::{Identity, Scopes, SessionData},
	obs::{self, ExchangeOutcome, ExchangeSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Connector specialized for the crate's default reqwest transport stack.
pub type ReqwestConnector = WecomConnector<ReqwestHttpClient>;

/// Query parameters extracted from the vendor's browser redirect back to the host.
#[derive(Clone, Debug)]
pub struct CallbackParams {
	code: String,
}
impl CallbackParams {
	/// Wraps an already-extracted one-time code.
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: code.into() }
	}

	/// Extracts the `code` query parameter from the inbound callback URL.
	///
	/// The `state` parameter also present on the redirect is validated by the host, not by
	/// this connector.
	pub fn from_url(url: &Url) -> Result<Self> {
		url.query_pairs()
			.find(|(key, _)| key == "code")
			.map(|(_, value)| Self { code: value.into_owned() })
			.ok_or(Error::MissingAuthorizationCode)
	}

	/// One-time authorization code issued by the vendor.
	pub fn code(&self) -> &str {
		&self.code
	}
}

/// Callback-style connector bridging the host provider to the WeCom directory.
///
/// The connector owns the validated configuration and the vendor API client. Everything is
/// read-only after open, so one instance serves concurrent callback invocations without
/// synchronization.
#[derive(Clone)]
pub struct WecomConnector<C>
where
	C: ?Sized + VendorHttpClient,
{
	corp_id: String,
	corp_secret: String,
	agent_id: String,
	// Kept as the raw configured string; vendors match registered redirect URIs exactly, so
	// re-serializing a parsed `Url` would alter what goes on the wire.
	redirect_uri: String,
	qr_connect_url: Url,
	api: VendorApiClient<C>,
}
impl<C> WecomConnector<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Validates the configuration and opens a connector on a caller-provided transport.
	///
	/// Malformed configuration surfaces here, never during a login.
	pub fn with_http_client(
		config: ConnectorConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let endpoints = config.validate()?;
		let api = VendorApiClient::from_endpoints(&endpoints, http_client.into());
		let ConnectorEndpoints { qr_connect, .. } = endpoints;

		Ok(Self {
			corp_id: config.corp_id,
			corp_secret: config.corp_secret,
			agent_id: config.agent_id,
			redirect_uri: config.redirect_uri,
			qr_connect_url: qr_connect,
			api,
		})
	}

	/// Builds the authorization redirect URL the end user is sent to.
	///
	/// Appends `appid` (the corp identifier), `agentid`, the host-supplied anti-CSRF `state`
	/// (passed through unmodified), and `redirect_uri` (emitted exactly as configured) to the
	/// configured authorization endpoint. `callback_url` is accepted for host interface
	/// compatibility but the configured redirect URI is always used; single-tenant vendor
	/// apps register exactly one redirect URI with the vendor. The output is byte-identical
	/// for identical inputs.
	pub fn login_url(&self, _scopes: &Scopes, _callback_url: &str, state: &str) -> String {
		let mut url = self.qr_connect_url.clone();
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("appid", &self.corp_id);
		pairs.append_pair("agentid", &self.agent_id);
		pairs.append_pair("state", state);
		pairs.append_pair("redirect_uri", &self.redirect_uri);

		drop(pairs);

		url.into()
	}

	/// Handles the vendor's callback redirect: runs the three dependent exchanges and maps
	/// the directory record into a canonical identity.
	///
	/// The pipeline is all-or-nothing. The first failing step aborts the whole callback and
	/// the returned error names that step; later steps are never attempted. When the host
	/// requested offline access, the access credential is serialized into the identity's
	/// opaque connector data.
	pub async fn handle_callback(
		&self,
		scopes: &Scopes,
		params: &CallbackParams,
	) -> Result<Identity> {
		let span = ExchangeSpan::new("handle_callback");

		span.instrument(async move {
			let token = self
				.run_step(
					ExchangeStep::TokenExchange,
					self.api.exchange_token(&self.corp_id, &self.corp_secret),
				)
				.await?;
			let resolved = self
				.run_step(
					ExchangeStep::UserIdExchange,
					self.api.exchange_user_id(&token.access_token, params.code()),
				)
				.await?;
			let profile = self
				.run_step(
					ExchangeStep::ProfileFetch,
					self.api.fetch_user_profile(&token.access_token, &resolved.user_id),
				)
				.await?;
			let mut identity = Identity::from_profile(&profile);

			if scopes.offline_access {
				let session = SessionData { access_token: token.access_token };
				let bytes = serde_json::to_vec(&session)
					.map_err(|source| Error::SessionDataEncode { source })?;

				identity.connector_data = Some(bytes);
			}

			Ok(identity)
		})
		.await
	}

	async fn run_step<T>(
		&self,
		step: ExchangeStep,
		exchange: impl Future<Output = Result<T, ExchangeError>>,
	) -> Result<T> {
		let span = ExchangeSpan::for_step(step, "exchange");

		obs::record_exchange_outcome(step, ExchangeOutcome::Attempt);

		let result = span.instrument(exchange).await;

		match &result {
			Ok(_) => obs::record_exchange_outcome(step, ExchangeOutcome::Success),
			Err(_) => obs::record_exchange_outcome(step, ExchangeOutcome::Failure),
		}

		result.map_err(|source| Error::exchange(step, source))
	}
}
impl<C> Debug for WecomConnector<C>
where
	C: ?Sized + VendorHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WecomConnector")
			.field("corp_id", &self.corp_id)
			.field("agent_id", &self.agent_id)
			.field("redirect_uri", &self.redirect_uri)
			.field("qr_connect_url", &self.qr_connect_url)
			.field("corp_secret_set", &!self.corp_secret.is_empty())
			.finish()
	}
}
