#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use wecom_connector::{
	_preludet::*,
	connector::CallbackParams,
	error::{ExchangeError, ExchangeStep, TransportError},
	identity::{Scopes, SessionData},
};

const CODE: &str = "Io1SvwImGcPPjdivyXOq";
const TOKEN_BODY: &str = r#"{"errcode":0,"errmsg":"ok","access_token":"T1","expires_in":7200}"#;
const USER_ID_BODY: &str = r#"{"UserId":"wangwei","DeviceId":"","errcode":0,"errmsg":"ok"}"#;
const PROFILE_BODY: &str = r#"{"errcode":0,"errmsg":"ok","userid":"wangwei","name":"王威","department":[28],"position":"","mobile":"15618388792","gender":"1","email":"","status":1,"main_department":28,"biz_mail":"wangwei@example.com"}"#;

async fn mock_token<'a>(server: &'a MockServer, status: u16, body: &str) -> httpmock::Mock<'a> {
	let body = body.to_owned();

	server
		.mock_async(move |when, then| {
			when.method(GET)
				.path("/gettoken")
				.query_param("corpid", TEST_CORP_ID)
				.query_param("corpsecret", TEST_CORP_SECRET);
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

async fn mock_user_id<'a>(server: &'a MockServer, status: u16, body: &str) -> httpmock::Mock<'a> {
	let body = body.to_owned();

	server
		.mock_async(move |when, then| {
			when.method(GET)
				.path("/user/getuserinfo")
				.query_param("access_token", "T1")
				.query_param("code", CODE);
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

async fn mock_profile<'a>(server: &'a MockServer, status: u16, body: &str) -> httpmock::Mock<'a> {
	let body = body.to_owned();

	server
		.mock_async(move |when, then| {
			when.method(GET)
				.path("/user/get")
				.query_param("access_token", "T1")
				.query_param("userid", "wangwei");
			then.status(status).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn callback_maps_the_directory_record_into_a_canonical_identity() {
	let server = MockServer::start_async().await;
	let connector = build_test_connector(&server.base_url());
	let token_mock = mock_token(&server, 200, TOKEN_BODY).await;
	let user_id_mock = mock_user_id(&server, 200, USER_ID_BODY).await;
	let profile_mock = mock_profile(&server, 200, PROFILE_BODY).await;
	let identity = connector
		.handle_callback(&Scopes::default(), &CallbackParams::new(CODE))
		.await
		.expect("Callback handling should succeed.");

	token_mock.assert_async().await;
	user_id_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(identity.user_id, "wangwei");
	assert_eq!(identity.username, "王威");
	assert_eq!(identity.preferred_username, "王威");
	assert_eq!(identity.email, "wangwei@example.com");
	assert!(identity.email_verified);
	assert_eq!(identity.phone_number, "15618388792");
	assert!(
		identity.connector_data.is_none(),
		"Connector data must be absent when offline access was not requested."
	);
}

#[tokio::test]
async fn offline_access_retains_exactly_the_access_credential() {
	let server = MockServer::start_async().await;
	let connector = build_test_connector(&server.base_url());
	let _token_mock = mock_token(&server, 200, TOKEN_BODY).await;
	let _user_id_mock = mock_user_id(&server, 200, USER_ID_BODY).await;
	let _profile_mock = mock_profile(&server, 200, PROFILE_BODY).await;
	let identity = connector
		.handle_callback(&Scopes { offline_access: true }, &CallbackParams::new(CODE))
		.await
		.expect("Callback handling should succeed.");
	let data = identity
		.connector_data
		.expect("Connector data must be present when offline access was requested.");
	let session: SessionData =
		serde_json::from_slice(&data).expect("Connector data should parse as session JSON.");

	assert_eq!(session.access_token, "T1");

	let raw: serde_json::Value =
		serde_json::from_slice(&data).expect("Connector data should parse as generic JSON.");

	assert_eq!(raw, serde_json::json!({ "accessToken": "T1" }));
}

#[tokio::test]
async fn token_step_application_error_aborts_before_the_user_id_exchange() {
	let server = MockServer::start_async().await;
	let connector = build_test_connector(&server.base_url());
	let token_mock =
		mock_token(&server, 200, r#"{"errcode":40013,"errmsg":"invalid corpid"}"#).await;
	let user_id_mock = mock_user_id(&server, 200, USER_ID_BODY).await;
	let err = connector
		.handle_callback(&Scopes::default(), &CallbackParams::new(CODE))
		.await
		.expect_err("Application-level failure must abort the callback.");

	token_mock.assert_async().await;
	user_id_mock.assert_hits_async(0).await;

	assert_eq!(err.failed_step(), Some(ExchangeStep::TokenExchange));
	assert!(matches!(
		err,
		Error::Exchange {
			step: ExchangeStep::TokenExchange,
			source: ExchangeError::RemoteApplication { code: 40013, .. },
		}
	));
}

#[tokio::test]
async fn user_id_step_http_failure_carries_status_and_body_and_skips_the_profile_fetch() {
	let server = MockServer::start_async().await;
	let connector = build_test_connector(&server.base_url());
	let _token_mock = mock_token(&server, 200, TOKEN_BODY).await;
	let user_id_mock = mock_user_id(&server, 500, "internal error").await;
	let profile_mock = mock_profile(&server, 200, PROFILE_BODY).await;
	let err = connector
		.handle_callback(&Scopes::default(), &CallbackParams::new(CODE))
		.await
		.expect_err("HTTP 500 must abort the callback.");

	user_id_mock.assert_async().await;
	profile_mock.assert_hits_async(0).await;

	match err {
		Error::Exchange {
			step: ExchangeStep::UserIdExchange,
			source: ExchangeError::RemoteStatus { status, body },
		} => {
			assert_eq!(status, 500);
			assert!(body.contains("internal error"));
		},
		other => panic!("Unexpected error variant: {other:?}"),
	}
}

#[tokio::test]
async fn profile_step_application_error_yields_no_identity() {
	let server = MockServer::start_async().await;
	let connector = build_test_connector(&server.base_url());
	let _token_mock = mock_token(&server, 200, TOKEN_BODY).await;
	let _user_id_mock = mock_user_id(&server, 200, USER_ID_BODY).await;
	let _profile_mock =
		mock_profile(&server, 200, r#"{"errcode":60111,"errmsg":"userid not found"}"#).await;
	let err = connector
		.handle_callback(&Scopes { offline_access: true }, &CallbackParams::new(CODE))
		.await
		.expect_err("Profile-step failure must abort the callback.");

	assert_eq!(err.failed_step(), Some(ExchangeStep::ProfileFetch));
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_a_transport_error_naming_the_token_step() {
	// Port 9 (discard) is reserved and nothing listens there, so the connection is refused.
	let connector = build_test_connector("http://127.0.0.1:9");
	let err = connector
		.handle_callback(&Scopes::default(), &CallbackParams::new(CODE))
		.await
		.expect_err("An unreachable endpoint must abort the callback.");

	assert_eq!(err.failed_step(), Some(ExchangeStep::TokenExchange));
	assert!(matches!(
		err,
		Error::Exchange {
			step: ExchangeStep::TokenExchange,
			source: ExchangeError::Transport(TransportError::Network { .. }),
		}
	));
}

#[tokio::test]
async fn malformed_token_payload_surfaces_a_decode_error() {
	let server = MockServer::start_async().await;
	let connector = build_test_connector(&server.base_url());
	let token_mock = mock_token(&server, 200, "<html>not json</html>").await;
	let user_id_mock = mock_user_id(&server, 200, USER_ID_BODY).await;
	let err = connector
		.handle_callback(&Scopes::default(), &CallbackParams::new(CODE))
		.await
		.expect_err("Malformed JSON must abort the callback.");

	token_mock.assert_async().await;
	user_id_mock.assert_hits_async(0).await;

	assert!(matches!(
		err,
		Error::Exchange {
			step: ExchangeStep::TokenExchange,
			source: ExchangeError::Decode { .. },
		}
	));
}
