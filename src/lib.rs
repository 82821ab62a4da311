//! WeCom identity-federation connector—delegate OpenID Connect logins to a WeCom-style
//! corporate directory and hand the host provider a normalized identity record.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod config;
pub mod connector;
pub mod error;
pub mod http;
pub mod identity;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{config::ConnectorConfig, connector::WecomConnector, http::ReqwestHttpClient};

	/// Corp identifier used by every test configuration.
	pub const TEST_CORP_ID: &str = "corp-it";
	/// Corp secret used by every test configuration.
	pub const TEST_CORP_SECRET: &str = "secret-it";
	/// Agent identifier used by every test configuration.
	pub const TEST_AGENT_ID: &str = "1000002";
	/// Redirect URI registered by every test configuration.
	pub const TEST_REDIRECT_URI: &str = "https://idp.example.com/callback";

	/// Connector type alias used by reqwest-backed integration tests.
	pub type ReqwestTestConnector = WecomConnector<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Configuration fixture pointing every vendor exchange endpoint at the provided mock base
	/// URL.
	pub fn test_config(base_url: &str) -> ConnectorConfig {
		ConnectorConfig {
			corp_id: TEST_CORP_ID.into(),
			corp_secret: TEST_CORP_SECRET.into(),
			agent_id: TEST_AGENT_ID.into(),
			redirect_uri: TEST_REDIRECT_URI.into(),
			access_token_uri: format!("{base_url}/gettoken"),
			user_id_uri: format!("{base_url}/user/getuserinfo"),
			user_info_uri: format!("{base_url}/user/get"),
			qr_connect_uri: "https://login.work.weixin.qq.com/wwlogin/sso/login".into(),
		}
	}

	/// Constructs a [`WecomConnector`] wired to the insecure test transport.
	pub fn build_test_connector(base_url: &str) -> ReqwestTestConnector {
		test_config(base_url)
			.open_with_http_client(test_reqwest_http_client())
			.expect("Test connector should open successfully.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _, wecom_connector as _};
