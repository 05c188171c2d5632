//! Client scope and protocol mapper descriptors.

// self
use crate::_prelude::*;

/// One OIDC client scope and the mappers that populate its claims.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientScopeDescriptor {
	/// Scope name; the natural lookup key.
	pub name: String,
	/// Scope description.
	#[serde(default)]
	pub description: String,
	/// Protocol, normally `openid-connect`.
	pub protocol: String,
	/// Scope attributes such as `include.in.token.scope`.
	#[serde(default)]
	pub attributes: BTreeMap<String, String>,
	/// Mappers attached after the scope exists, in order.
	#[serde(default)]
	pub protocol_mappers: Vec<ProtocolMapperDescriptor>,
}
impl ClientScopeDescriptor {
	/// Payload for `POST client-scopes`; mappers are attached separately.
	pub fn creation_payload(&self) -> Value {
		serde_json::json!({
			"name": self.name,
			"description": self.description,
			"protocol": self.protocol,
			"attributes": self.attributes,
		})
	}
}

/// Rule mapping a user or client attribute onto a token claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMapperDescriptor {
	/// Mapper name, unique within its scope.
	pub name: String,
	/// Protocol, normally `openid-connect`.
	pub protocol: String,
	/// Mapper provider id, e.g. `oidc-usermodel-property-mapper`.
	pub protocol_mapper: String,
	/// Whether user consent is required.
	#[serde(default)]
	pub consent_required: bool,
	/// Provider-specific configuration.
	#[serde(default)]
	pub config: BTreeMap<String, String>,
}
