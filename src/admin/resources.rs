//! Per-resource helpers composed from the four verbs.
//!
//! These add no status handling of their own; they fix the path templates and pull
//! identifiers out of list or lookup responses.

// self
use crate::{
	_prelude::*,
	admin::{AdminClient, AdminPath, DeleteOutcome, PostOutcome, RemoteHandle, ResourceKind},
};

impl AdminClient {
	/// `GET /realms/{realm}`.
	pub async fn get_realm(&self, realm: &str) -> Option<Value> {
		self.get(&AdminPath::realm(realm)).await
	}

	/// `POST /realms`.
	pub async fn create_realm(&self, payload: &Value) -> PostOutcome {
		self.post(&AdminPath::realms(), payload).await
	}

	/// `PUT /realms/{realm}`.
	pub async fn update_realm(&self, realm: &str, payload: &Value) -> bool {
		self.put(&AdminPath::realm(realm), payload).await
	}

	/// `DELETE /realms/{realm}`.
	pub async fn delete_realm(&self, realm: &str) -> DeleteOutcome {
		self.delete(&AdminPath::realm(realm)).await
	}

	/// `GET /realms/{realm}/client-scopes`.
	pub async fn list_client_scopes(&self, realm: &str) -> Option<Vec<Value>> {
		let path = AdminPath::realm(realm).join("client-scopes");

		into_list(self.get(&path).await?, ResourceKind::ClientScope)
	}

	/// Finds a client scope by exact name.
	pub async fn find_client_scope(&self, realm: &str, name: &str) -> Option<Value> {
		self.list_client_scopes(realm).await?.into_iter().find(|scope| has_name(scope, name))
	}

	/// `POST /realms/{realm}/client-scopes`.
	pub async fn create_client_scope(&self, realm: &str, payload: &Value) -> PostOutcome {
		self.post(&AdminPath::realm(realm).join("client-scopes"), payload).await
	}

	/// `DELETE /realms/{realm}/client-scopes/{id}`.
	pub async fn delete_client_scope(&self, realm: &str, scope: &RemoteHandle) -> DeleteOutcome {
		self.delete(&AdminPath::realm(realm).join("client-scopes").join(scope.id.as_str())).await
	}

	/// `GET /realms/{realm}/client-scopes/{id}/protocol-mappers/models`.
	pub async fn list_protocol_mappers(
		&self,
		realm: &str,
		scope: &RemoteHandle,
	) -> Option<Vec<Value>> {
		into_list(self.get(&protocol_mappers(realm, scope)).await?, ResourceKind::ProtocolMapper)
	}

	/// `POST /realms/{realm}/client-scopes/{id}/protocol-mappers/models`.
	pub async fn create_protocol_mapper(
		&self,
		realm: &str,
		scope: &RemoteHandle,
		payload: &Value,
	) -> PostOutcome {
		self.post(&protocol_mappers(realm, scope), payload).await
	}

	/// `GET /realms/{realm}/clients?clientId={client_id}`, taking the first match.
	pub async fn find_client(&self, realm: &str, client_id: &str) -> Option<Value> {
		let path = AdminPath::realm(realm).join("clients").query("clientId", client_id);

		into_list(self.get(&path).await?, ResourceKind::Client)?.into_iter().next()
	}

	/// `POST /realms/{realm}/clients`.
	pub async fn create_client(&self, realm: &str, payload: &Value) -> PostOutcome {
		self.post(&AdminPath::realm(realm).join("clients"), payload).await
	}

	/// `PUT /realms/{realm}/clients/{id}`.
	pub async fn update_client(&self, realm: &str, client: &RemoteHandle, payload: &Value) -> bool {
		self.put(&client_path(realm, client), payload).await
	}

	/// `DELETE /realms/{realm}/clients/{id}`.
	pub async fn delete_client(&self, realm: &str, client: &RemoteHandle) -> DeleteOutcome {
		self.delete(&client_path(realm, client)).await
	}

	/// `PUT /realms/{realm}/clients/{id}/default-client-scopes/{scope}`.
	pub async fn assign_default_client_scope(
		&self,
		realm: &str,
		client: &RemoteHandle,
		scope: &RemoteHandle,
	) -> bool {
		let path = client_path(realm, client).join("default-client-scopes").join(scope.id.as_str());

		self.put(&path, &Value::Object(Map::new())).await
	}

	/// `PUT /realms/{realm}/clients/{id}/optional-client-scopes/{scope}`.
	pub async fn assign_optional_client_scope(
		&self,
		realm: &str,
		client: &RemoteHandle,
		scope: &RemoteHandle,
	) -> bool {
		let path =
			client_path(realm, client).join("optional-client-scopes").join(scope.id.as_str());

		self.put(&path, &Value::Object(Map::new())).await
	}

	/// `GET /realms/{realm}/roles/{name}`.
	pub async fn get_realm_role(&self, realm: &str, name: &str) -> Option<Value> {
		self.get(&AdminPath::realm(realm).join("roles").join(name)).await
	}

	/// `POST /realms/{realm}/roles`.
	pub async fn create_realm_role(&self, realm: &str, payload: &Value) -> PostOutcome {
		self.post(&AdminPath::realm(realm).join("roles"), payload).await
	}

	/// `DELETE /realms/{realm}/roles/{name}`.
	pub async fn delete_realm_role(&self, realm: &str, name: &str) -> DeleteOutcome {
		self.delete(&AdminPath::realm(realm).join("roles").join(name)).await
	}

	/// `GET /realms/{realm}/groups?search={name}`, keeping only an exact name match.
	pub async fn find_group(&self, realm: &str, name: &str) -> Option<Value> {
		let path = AdminPath::realm(realm).join("groups").query("search", name);

		into_list(self.get(&path).await?, ResourceKind::Group)?
			.into_iter()
			.find(|group| has_name(group, name))
	}

	/// `POST /realms/{realm}/groups`.
	pub async fn create_group(&self, realm: &str, payload: &Value) -> PostOutcome {
		self.post(&AdminPath::realm(realm).join("groups"), payload).await
	}

	/// `DELETE /realms/{realm}/groups/{id}`.
	pub async fn delete_group(&self, realm: &str, group: &RemoteHandle) -> DeleteOutcome {
		self.delete(&AdminPath::realm(realm).join("groups").join(group.id.as_str())).await
	}

	/// `GET /realms/{realm}/users/profile`.
	pub async fn get_user_profile(&self, realm: &str) -> Option<Value> {
		self.get(&user_profile_path(realm)).await
	}

	/// `PUT /realms/{realm}/users/profile`.
	pub async fn update_user_profile(&self, realm: &str, profile: &Value) -> bool {
		self.put(&user_profile_path(realm), profile).await
	}
}

fn client_path(realm: &str, client: &RemoteHandle) -> AdminPath {
	AdminPath::realm(realm).join("clients").join(client.id.as_str())
}

fn protocol_mappers(realm: &str, scope: &RemoteHandle) -> AdminPath {
	AdminPath::realm(realm)
		.join("client-scopes")
		.join(scope.id.as_str())
		.join("protocol-mappers")
		.join("models")
}

fn user_profile_path(realm: &str) -> AdminPath {
	AdminPath::realm(realm).join("users").join("profile")
}

fn has_name(representation: &Value, name: &str) -> bool {
	representation.get("name").and_then(Value::as_str) == Some(name)
}

fn into_list(value: Value, kind: ResourceKind) -> Option<Vec<Value>> {
	match value {
		Value::Array(items) => Some(items),
		other => {
			tracing::error!(
				resource = kind.as_str(),
				found = json_type(&other),
				"Admin API returned a non-list response for a list endpoint."
			);

			None
		},
	}
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn list_conversion_rejects_objects() {
		assert_eq!(
			into_list(serde_json::json!([{ "name": "a" }]), ResourceKind::Group).map(|v| v.len()),
			Some(1)
		);
		assert!(into_list(serde_json::json!({ "name": "a" }), ResourceKind::Group).is_none());
	}

	#[test]
	fn name_matching_is_exact() {
		let group = serde_json::json!({ "name": "admins" });

		assert!(has_name(&group, "admins"));
		assert!(!has_name(&group, "admin"));
	}
}
