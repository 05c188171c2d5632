//! Administrator credentials exchanged for a bearer token.

// self
use crate::{_prelude::*, auth::Secret};

/// Password-grant credentials for the administrative realm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminCredentials {
	/// Realm the administrator account lives in (usually `master`).
	pub realm: String,
	/// Public OAuth client used for the password grant (usually `admin-cli`).
	pub client_id: String,
	/// Administrator username.
	pub username: String,
	/// Administrator password.
	pub password: Secret,
}
impl AdminCredentials {
	/// Default administrative realm.
	pub const DEFAULT_REALM: &'static str = "master";
	/// Default public client used for administrative logins.
	pub const DEFAULT_CLIENT_ID: &'static str = "admin-cli";

	/// Creates credentials against the default realm and client.
	pub fn new(username: impl Into<String>, password: impl Into<Secret>) -> Self {
		Self {
			realm: Self::DEFAULT_REALM.into(),
			client_id: Self::DEFAULT_CLIENT_ID.into(),
			username: username.into(),
			password: password.into(),
		}
	}

	/// Overrides the administrative realm.
	pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
		self.realm = realm.into();

		self
	}

	/// Overrides the OAuth client identifier.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}
}
