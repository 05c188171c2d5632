//! Desired-state descriptors, loaded once and read-only for the rest of a run.
//!
//! A [`Blueprint`] is either the built-in [`Blueprint::default`] or a JSON document read with
//! [`Blueprint::load`]. Both pass through [`Blueprint::validate`] before any manager sees them.

pub mod client;
pub mod profile;
pub mod realm;
pub mod scope;

mod defaults;

pub use client::*;
pub use profile::*;
pub use realm::*;
pub use scope::*;

// std
use std::path::Path;
// self
use crate::{_prelude::*, error::ConfigError};

/// Structural problems in a blueprint that would make a run ambiguous.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum BlueprintError {
	/// A name or identifier is empty.
	#[error("A {kind} has an empty name.")]
	EmptyName {
		/// Descriptor family.
		kind: &'static str,
	},
	/// Two descriptors of the same family share a natural key.
	#[error("Duplicate {kind} `{name}`.")]
	DuplicateName {
		/// Descriptor family.
		kind: &'static str,
		/// Repeated key.
		name: String,
	},
	/// A scope is listed as both default and optional for the same client.
	#[error("Client `{client_id}` lists scope `{scope}` as both default and optional.")]
	ConflictingScopeAssignment {
		/// Offending client.
		client_id: String,
		/// Scope listed twice.
		scope: String,
	},
	/// A public client carries a secret.
	#[error("Public client `{client_id}` must not carry a secret.")]
	PublicClientWithSecret {
		/// Offending client.
		client_id: String,
	},
}

/// Complete desired state for one realm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
	/// Realm settings.
	pub realm: RealmDescriptor,
	/// Client scopes, created in order.
	#[serde(default)]
	pub client_scopes: Vec<ClientScopeDescriptor>,
	/// OAuth clients, each driven by its own manager in order.
	#[serde(default)]
	pub clients: Vec<ClientDescriptor>,
	/// Roles, groups, and profile attributes.
	#[serde(default)]
	pub user_profile: UserProfileDescriptor,
}
impl Blueprint {
	/// Reads, parses, and validates a JSON blueprint file.
	pub fn load(path: &Path) -> Result<Self> {
		let raw = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::BlueprintRead { path: path.to_path_buf(), source })?;
		let blueprint = Self::from_json_str(&raw)?;

		tracing::info!(path = %path.display(), "Loaded blueprint file.");

		Ok(blueprint)
	}

	/// Parses and validates a JSON blueprint document.
	pub fn from_json_str(raw: &str) -> Result<Self> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let blueprint: Self = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::BlueprintParse { source })?;

		blueprint.validate()?;

		Ok(blueprint)
	}

	/// Rejects empty names, duplicate keys, and contradictory client settings.
	pub fn validate(&self) -> Result<(), BlueprintError> {
		if self.realm.realm.trim().is_empty() {
			return Err(BlueprintError::EmptyName { kind: "realm" });
		}

		unique_names("client scope", self.client_scopes.iter().map(|scope| scope.name.as_str()))?;
		unique_names("client", self.clients.iter().map(|client| client.client_id.as_str()))?;
		unique_names("role", self.user_profile.roles.iter().map(|role| role.name.as_str()))?;
		unique_names("group", self.user_profile.groups.iter().map(|group| group.name.as_str()))?;
		unique_names(
			"profile attribute",
			self.user_profile.attributes.iter().map(|attribute| attribute.name.as_str()),
		)?;

		for scope in &self.client_scopes {
			unique_names(
				"protocol mapper",
				scope.protocol_mappers.iter().map(|mapper| mapper.name.as_str()),
			)?;
		}
		for client in &self.clients {
			if client.public_client && client.secret.is_some() {
				return Err(BlueprintError::PublicClientWithSecret {
					client_id: client.client_id.clone(),
				});
			}
			if let Some(scope) = client
				.default_client_scopes
				.iter()
				.find(|scope| client.optional_client_scopes.contains(scope))
			{
				return Err(BlueprintError::ConflictingScopeAssignment {
					client_id: client.client_id.clone(),
					scope: scope.clone(),
				});
			}
		}

		Ok(())
	}

	/// Looks up a managed client scope by name.
	pub fn client_scope(&self, name: &str) -> Option<&ClientScopeDescriptor> {
		self.client_scopes.iter().find(|scope| scope.name == name)
	}
}
impl Default for Blueprint {
	fn default() -> Self {
		defaults::padmini_systems()
	}
}

fn unique_names<'a>(
	kind: &'static str,
	names: impl Iterator<Item = &'a str>,
) -> Result<(), BlueprintError> {
	let mut seen = HashSet::new();

	for name in names {
		if name.trim().is_empty() {
			return Err(BlueprintError::EmptyName { kind });
		}
		if !seen.insert(name) {
			return Err(BlueprintError::DuplicateName { kind, name: name.to_owned() });
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn built_in_blueprint_is_valid() {
		let blueprint = Blueprint::default();

		blueprint.validate().expect("Built-in blueprint should validate.");

		assert_eq!(blueprint.realm.realm, "padmini-systems");
		assert_eq!(blueprint.client_scopes.len(), 4);
		assert_eq!(blueprint.clients.len(), 2);
		assert!(blueprint.client_scope("mobile").is_some());
	}

	#[test]
	fn json_round_trip_preserves_the_built_in_blueprint() {
		let rendered =
			serde_json::to_string(&Blueprint::default()).expect("Blueprint should serialize.");
		let parsed = Blueprint::from_json_str(&rendered).expect("Blueprint should parse back.");

		assert_eq!(parsed, Blueprint::default());
	}

	#[test]
	fn parse_errors_report_the_failing_path() {
		let err = Blueprint::from_json_str(
			r#"{
				"realm": {
					"realm": "r",
					"displayName": "R",
					"enabled": true,
					"sslRequired": "external",
					"registrationAllowed": true,
					"verifyEmail": true
				},
				"clients": [{ "clientId": "web", "name": "Web", "enabled": "yes", "publicClient": true }]
			}"#,
		)
		.expect_err("A string where a bool is expected should fail.");

		match err {
			Error::Config(ConfigError::BlueprintParse { source }) =>
				assert_eq!(source.path().to_string(), "clients[0].enabled"),
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn validation_rejects_duplicates_and_contradictions() {
		let mut blueprint = Blueprint::default();

		blueprint.client_scopes.push(blueprint.client_scopes[0].clone());

		assert!(matches!(
			blueprint.validate(),
			Err(BlueprintError::DuplicateName { kind: "client scope", .. })
		));

		let mut blueprint = Blueprint::default();
		let scope = blueprint.clients[0].default_client_scopes[0].clone();

		blueprint.clients[0].optional_client_scopes.push(scope);

		assert!(matches!(
			blueprint.validate(),
			Err(BlueprintError::ConflictingScopeAssignment { .. })
		));

		let mut blueprint = Blueprint::default();

		blueprint.realm.realm = " ".into();

		assert_eq!(blueprint.validate(), Err(BlueprintError::EmptyName { kind: "realm" }));
	}
}
