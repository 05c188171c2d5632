//! OAuth client descriptor.

// self
use crate::{_prelude::*, auth::Secret};

/// Desired OAuth/OIDC client, public or confidential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDescriptor {
	/// Client identifier; the natural lookup key.
	pub client_id: String,
	/// Display name.
	pub name: String,
	/// Description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Whether the client may request tokens.
	pub enabled: bool,
	/// Public clients hold no secret.
	pub public_client: bool,
	/// Authorization code flow.
	#[serde(default)]
	pub standard_flow_enabled: bool,
	/// Implicit flow.
	#[serde(default)]
	pub implicit_flow_enabled: bool,
	/// Resource owner password grant.
	#[serde(default)]
	pub direct_access_grants_enabled: bool,
	/// Client credentials grant via a service account.
	#[serde(default)]
	pub service_accounts_enabled: bool,
	/// Fine-grained authorization services.
	#[serde(default)]
	pub authorization_services_enabled: bool,
	/// Client secret for confidential clients.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secret: Option<Secret>,
	/// Root URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub root_url: Option<String>,
	/// Admin URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub admin_url: Option<String>,
	/// Base URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
	/// Allowed redirect URIs.
	#[serde(default)]
	pub redirect_uris: Vec<String>,
	/// Allowed CORS origins.
	#[serde(default)]
	pub web_origins: Vec<String>,
	/// Client attributes.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub attributes: BTreeMap<String, String>,
	/// Scopes always included in tokens.
	#[serde(default)]
	pub default_client_scopes: Vec<String>,
	/// Scopes included on request.
	#[serde(default)]
	pub optional_client_scopes: Vec<String>,
}
impl ClientDescriptor {
	/// Full representation for `POST clients`.
	pub fn creation_payload(&self) -> Result<Value> {
		Ok(serde_json::to_value(self)?)
	}

	/// Converging subset applied with `PUT clients/{id}` when the client already exists.
	pub fn update_payload(&self) -> Value {
		serde_json::json!({
			"redirectUris": self.redirect_uris,
			"webOrigins": self.web_origins,
			"enabled": self.enabled,
			"publicClient": self.public_client,
			"serviceAccountsEnabled": self.service_accounts_enabled,
			"authorizationServicesEnabled": self.authorization_services_enabled,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn payloads_use_admin_api_field_names() {
		let client: ClientDescriptor = serde_json::from_value(serde_json::json!({
			"clientId": "svc",
			"name": "Service",
			"enabled": true,
			"publicClient": false,
			"serviceAccountsEnabled": true,
			"secret": "s3cr3t",
			"redirectUris": ["https://svc.test/*"],
		}))
		.expect("Client descriptor should deserialize.");
		let creation = client.creation_payload().expect("Creation payload should serialize.");
		let update = client.update_payload();

		assert_eq!(creation["clientId"], "svc");
		assert_eq!(creation["secret"], "s3cr3t");
		assert!(creation.get("rootUrl").is_none());
		assert_eq!(update["serviceAccountsEnabled"], true);
		assert_eq!(update["redirectUris"][0], "https://svc.test/*");
		assert!(update.get("secret").is_none());
		assert!(!format!("{client:?}").contains("s3cr3t"));
	}
}
