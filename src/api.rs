//! Vendor API client: the three directory exchanges and their wire types.
//!
//! All knowledge of the vendor's URL and query shapes lives here. Each call is independent
//! and stateless, and no retry or backoff is performed: the one-time login code is
//! single-use on the vendor side, so a failed exchange is only retriable by re-driving the
//! whole login with a fresh code.

// self
use crate::{
	_prelude::*,
	config::ConnectorEndpoints,
	error::ExchangeError,
	http::{VendorHttpClient, VendorResponse},
};

const ERRCODE_OK: i64 = 0;
const STATUS_OK: u16 = 200;

/// Response payload of the token exchange endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResult {
	/// Opaque access credential consumed by the subsequent exchanges.
	#[serde(default)]
	pub access_token: String,
	/// Credential lifetime in seconds, relative to issuance.
	#[serde(default)]
	pub expires_in: i64,
	/// Vendor application-level error code; zero means success.
	#[serde(default)]
	pub errcode: i64,
	/// Vendor application-level error message.
	#[serde(default)]
	pub errmsg: String,
}
impl TokenResult {
	/// Absolute expiry instant, for hosts that persist the credential for offline use.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> OffsetDateTime {
		issued_at + Duration::seconds(self.expires_in)
	}
}

/// Response payload of the code to user-id exchange endpoint.
///
/// The vendor uses PascalCase for this payload's identifier fields.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserIdResult {
	/// Internal vendor user identifier resolved from the one-time code.
	#[serde(default, rename = "UserId")]
	pub user_id: String,
	/// Device identifier reported by the vendor; carried but unused by the connector.
	#[serde(default, rename = "DeviceId")]
	pub device_id: String,
	/// Vendor application-level error code; zero means success.
	#[serde(default)]
	pub errcode: i64,
	/// Vendor application-level error message.
	#[serde(default)]
	pub errmsg: String,
}

/// Directory record returned by the profile endpoint.
///
/// Only `userid`, `name`, `mobile`, and `biz_mail` feed the canonical identity; the other
/// fields mirror what the vendor actually sends so decoding never trips over them. Every
/// field defaults because the vendor omits fields freely.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserProfile {
	/// Stable user identifier inside the vendor directory.
	#[serde(default)]
	pub userid: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Mobile number.
	#[serde(default)]
	pub mobile: String,
	/// Business email; the stable federated identifier.
	#[serde(default)]
	pub biz_mail: String,
	/// Department identifiers the user belongs to.
	#[serde(default)]
	pub department: Vec<i64>,
	/// Primary department identifier.
	#[serde(default)]
	pub main_department: i64,
	/// Job position.
	#[serde(default)]
	pub position: String,
	/// Gender code as reported by the vendor.
	#[serde(default)]
	pub gender: String,
	/// Personal email; intentionally not used for the canonical identity.
	#[serde(default)]
	pub email: String,
	/// Avatar URL.
	#[serde(default)]
	pub avatar: String,
	/// Activation status code.
	#[serde(default)]
	pub status: i64,
	/// Whether the user leads a department.
	#[serde(default)]
	pub isleader: i64,
	/// Latin-script display name.
	#[serde(default)]
	pub english_name: String,
	/// Landline number.
	#[serde(default)]
	pub telephone: String,
	/// Whether the account is enabled.
	#[serde(default)]
	pub enable: i64,
	/// Directory alias.
	#[serde(default)]
	pub alias: String,
	/// Vendor application-level error code; zero means success.
	#[serde(default)]
	pub errcode: i64,
	/// Vendor application-level error message.
	#[serde(default)]
	pub errmsg: String,
}

/// Common application-level error envelope carried by every vendor payload.
pub(crate) trait VendorReply
where
	Self: serde::de::DeserializeOwned,
{
	fn error_code(&self) -> i64;
	fn error_message(&self) -> &str;
}

macro_rules! impl_vendor_reply {
	($($reply:ty),+ $(,)?) => {
		$(impl VendorReply for $reply {
			fn error_code(&self) -> i64 {
				self.errcode
			}

			fn error_message(&self) -> &str {
				&self.errmsg
			}
		})+
	};
}

impl_vendor_reply! { TokenResult, UserIdResult, UserProfile }

/// Performs the three vendor HTTP exchanges and decodes their JSON bodies.
#[derive(Clone, Debug)]
pub struct VendorApiClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	http_client: Arc<C>,
	access_token_url: Url,
	user_id_url: Url,
	user_info_url: Url,
}
impl<C> VendorApiClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Creates a client from the three exchange endpoints.
	pub fn new(
		access_token_url: Url,
		user_id_url: Url,
		user_info_url: Url,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			access_token_url,
			user_id_url,
			user_info_url,
		}
	}

	pub(crate) fn from_endpoints(endpoints: &ConnectorEndpoints, http_client: Arc<C>) -> Self {
		Self::new(
			endpoints.access_token.clone(),
			endpoints.user_id.clone(),
			endpoints.user_info.clone(),
			http_client,
		)
	}

	/// Exchanges the corp credentials for an access credential.
	///
	/// Credentials travel in the query string; that is a vendor wire constraint and must be
	/// preserved for compatibility.
	pub async fn exchange_token(
		&self,
		corp_id: &str,
		corp_secret: &str,
	) -> Result<TokenResult, ExchangeError> {
		let url =
			with_query(&self.access_token_url, &[("corpid", corp_id), ("corpsecret", corp_secret)]);

		self.call(url).await
	}

	/// Resolves the callback's one-time code to the vendor's internal user identifier.
	pub async fn exchange_user_id(
		&self,
		access_token: &str,
		code: &str,
	) -> Result<UserIdResult, ExchangeError> {
		let url = with_query(&self.user_id_url, &[("access_token", access_token), ("code", code)]);

		self.call(url).await
	}

	/// Fetches the directory record for a vendor user identifier.
	pub async fn fetch_user_profile(
		&self,
		access_token: &str,
		user_id: &str,
	) -> Result<UserProfile, ExchangeError> {
		let url =
			with_query(&self.user_info_url, &[("access_token", access_token), ("userid", user_id)]);

		self.call(url).await
	}

	async fn call<T>(&self, url: Url) -> Result<T, ExchangeError>
	where
		T: VendorReply,
	{
		let response = self.http_client.get(url).await?;

		decode_reply(response)
	}
}

fn with_query(endpoint: &Url, params: &[(&str, &str)]) -> Url {
	let mut url = endpoint.clone();
	let mut pairs = url.query_pairs_mut();

	for (key, value) in params {
		pairs.append_pair(key, value);
	}

	drop(pairs);

	url
}

fn decode_reply<T>(response: VendorResponse) -> Result<T, ExchangeError>
where
	T: VendorReply,
{
	if response.status != STATUS_OK {
		return Err(ExchangeError::RemoteStatus {
			status: response.status,
			body: response.body_text(),
		});
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
	let reply: T = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ExchangeError::Decode { source, status: response.status })?;

	if reply.error_code() != ERRCODE_OK {
		return Err(ExchangeError::RemoteApplication {
			code: reply.error_code(),
			message: reply.error_message().to_owned(),
		});
	}

	Ok(reply)
}
