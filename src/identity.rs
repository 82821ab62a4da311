//! Canonical identity record, login scopes, and the vendor profile mapper.

// self
use crate::{_prelude::*, api::UserProfile};

/// Request flags the host passes when driving a login.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scopes {
	/// Host wants to retain credentials for later non-interactive use.
	pub offline_access: bool,
}

/// Minimal connector state serialized into [`Identity::connector_data`] for offline access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
	/// Vendor access credential retained for the host's refresh logic.
	#[serde(rename = "accessToken")]
	pub access_token: String,
}

/// Normalized identity record handed back to the host provider.
///
/// Ownership transfers to the host on return; the connector never mutates it afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Stable user identifier inside the vendor directory.
	pub user_id: String,
	/// Display name.
	pub username: String,
	/// Preferred username; mirrors the display name for this vendor.
	pub preferred_username: String,
	/// Business email; the stable federated identifier.
	pub email: String,
	/// Whether the email is considered verified.
	pub email_verified: bool,
	/// Mobile number from the directory record.
	pub phone_number: String,
	/// Opaque connector session bytes; present if and only if offline access was requested.
	/// Absence is meaningful to the host's refresh logic, so this is never an empty value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub connector_data: Option<Vec<u8>>,
}
impl Identity {
	/// Maps a vendor directory record into the canonical identity shape.
	///
	/// The business email is the federated identifier; the vendor's personal `email` field is
	/// intentionally ignored. The vendor is the enterprise's own directory, so its business
	/// email is treated as pre-verified. Auxiliary directory fields (department, position,
	/// avatar, ...) are vendor-internal and dropped.
	pub fn from_profile(profile: &UserProfile) -> Self {
		Self {
			user_id: profile.userid.clone(),
			username: profile.name.clone(),
			preferred_username: profile.name.clone(),
			email: profile.biz_mail.clone(),
			email_verified: true,
			phone_number: profile.mobile.clone(),
			connector_data: None,
		}
	}
}
