//! Host-supplied connector configuration and its URL-validated form.

// self
use crate::{_prelude::*, connector::WecomConnector, error::ConfigError, http::VendorHttpClient};
#[cfg(feature = "reqwest")]
use crate::{connector::ReqwestConnector, http::ReqwestHttpClient};

/// Raw connector configuration as supplied by the host's configuration document.
///
/// Serde field names match the host-side JSON document (`corpId`, `corpSecret`, ...). Every
/// field is required and has no default. Validation happens when the connector is opened,
/// never during a login; an open connector's configuration is immutable and safe for
/// unsynchronized concurrent reads.
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectorConfig {
	/// Corporate identifier issued by the vendor.
	#[serde(rename = "corpId")]
	pub corp_id: String,
	/// Corporate secret paired with the corp identifier.
	#[serde(rename = "corpSecret")]
	pub corp_secret: String,
	/// Application (agent) identifier inside the corp.
	#[serde(rename = "agentId")]
	pub agent_id: String,
	/// Redirect URI registered with the vendor application.
	#[serde(rename = "redirectURI")]
	pub redirect_uri: String,
	/// Token exchange endpoint.
	#[serde(rename = "accessTokenURI")]
	pub access_token_uri: String,
	/// Code to user-id exchange endpoint.
	#[serde(rename = "userIdURI")]
	pub user_id_uri: String,
	/// Directory profile endpoint.
	#[serde(rename = "userInfoURI")]
	pub user_info_uri: String,
	/// Authorization (QR login) endpoint the end user is redirected to.
	#[serde(rename = "qrConnectURI")]
	pub qr_connect_uri: String,
}
impl ConnectorConfig {
	/// Validates the configuration and opens a connector on the default bounded transport.
	#[cfg(feature = "reqwest")]
	pub fn open(self) -> Result<ReqwestConnector> {
		self.open_with_http_client(ReqwestHttpClient::bounded()?)
	}

	/// Validates the configuration and opens a connector on a caller-provided transport.
	pub fn open_with_http_client<C>(
		self,
		http_client: impl Into<Arc<C>>,
	) -> Result<WecomConnector<C>>
	where
		C: ?Sized + VendorHttpClient,
	{
		WecomConnector::with_http_client(self, http_client)
	}

	pub(crate) fn validate(&self) -> Result<ConnectorEndpoints, ConfigError> {
		required("corpId", &self.corp_id)?;
		required("corpSecret", &self.corp_secret)?;
		required("agentId", &self.agent_id)?;
		// The redirect URI is checked for well-formedness only. The raw configured string is
		// what goes on the wire; vendors match registered redirect URIs exactly, and a parsed
		// `Url` re-serializes `https://host` as `https://host/`.
		parse_endpoint("redirectURI", &self.redirect_uri)?;

		Ok(ConnectorEndpoints {
			access_token: parse_endpoint("accessTokenURI", &self.access_token_uri)?,
			user_id: parse_endpoint("userIdURI", &self.user_id_uri)?,
			user_info: parse_endpoint("userInfoURI", &self.user_info_uri)?,
			qr_connect: parse_endpoint("qrConnectURI", &self.qr_connect_uri)?,
		})
	}
}

/// URL-validated endpoint set owned by an open connector.
#[derive(Clone, Debug)]
pub(crate) struct ConnectorEndpoints {
	pub(crate) access_token: Url,
	pub(crate) user_id: Url,
	pub(crate) user_info: Url,
	pub(crate) qr_connect: Url,
}

fn required(field: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() {
		return Err(ConfigError::MissingField { field });
	}

	Ok(())
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, ConfigError> {
	required(field, value)?;

	Url::parse(value).map_err(|source| ConfigError::InvalidEndpoint { field, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixture() -> ConnectorConfig {
		serde_json::from_str(
			r#"{
				"corpId": "wx227c3136c137e769",
				"corpSecret": "secret",
				"agentId": "1000002",
				"redirectURI": "https://idp.example.com/callback",
				"accessTokenURI": "https://qyapi.weixin.qq.com/cgi-bin/gettoken",
				"userIdURI": "https://qyapi.weixin.qq.com/cgi-bin/user/getuserinfo",
				"userInfoURI": "https://qyapi.weixin.qq.com/cgi-bin/user/get",
				"qrConnectURI": "https://open.work.weixin.qq.com/wwopen/sso/qrConnect"
			}"#,
		)
		.expect("Configuration document should deserialize successfully.")
	}

	#[test]
	fn host_document_field_names_deserialize() {
		let config = fixture();

		assert_eq!(config.corp_id, "wx227c3136c137e769");
		assert_eq!(config.agent_id, "1000002");
		assert_eq!(config.qr_connect_uri, "https://open.work.weixin.qq.com/wwopen/sso/qrConnect");
	}

	#[test]
	fn validation_accepts_well_formed_configuration() {
		let endpoints =
			fixture().validate().expect("Well-formed configuration should validate successfully.");

		assert_eq!(endpoints.access_token.path(), "/cgi-bin/gettoken");
		assert_eq!(endpoints.qr_connect.host_str(), Some("open.work.weixin.qq.com"));
	}

	#[test]
	fn malformed_redirect_uri_is_rejected_at_open_time() {
		let mut config = fixture();

		config.redirect_uri = "::not-a-uri::".into();

		let err = config.validate().expect_err("Malformed redirect URI must be rejected.");

		assert!(matches!(err, ConfigError::InvalidEndpoint { field: "redirectURI", .. }));
	}

	#[test]
	fn malformed_endpoint_is_rejected_at_open_time() {
		let mut config = fixture();

		config.user_info_uri = "not a uri".into();

		let err = config.validate().expect_err("Malformed URI must be rejected.");

		assert!(matches!(err, ConfigError::InvalidEndpoint { field: "userInfoURI", .. }));
	}

	#[test]
	fn empty_fields_are_rejected_at_open_time() {
		let mut config = fixture();

		config.corp_secret = " ".into();

		let err = config.validate().expect_err("Empty secret must be rejected.");

		assert!(matches!(err, ConfigError::MissingField { field: "corpSecret" }));
	}
}
