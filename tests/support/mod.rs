//! Fixtures shared by the integration tests: a mocked backend, a connected admin client, and a
//! compact blueprint for the `acme` realm.

#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::{Mock, prelude::*};
// self
use realm_provisioner::{
	admin::AdminClient,
	auth::AdminCredentials,
	blueprint::Blueprint,
	config::{ConnectionSettings, ReadinessPolicy},
	manager::ManagerContext,
};

pub const ACCESS_TOKEN: &str = "test-admin-token";
pub const BEARER: &str = "Bearer test-admin-token";
pub const READY_PATH: &str = "/health/ready";
pub const TOKEN_PATH: &str = "/realms/master/protocol/openid-connect/token";
pub const REALM: &str = "acme";

const BLUEPRINT: &str = r#"{
	"realm": {
		"realm": "acme",
		"displayName": "Acme",
		"enabled": true,
		"sslRequired": "external",
		"registrationAllowed": true,
		"verifyEmail": true,
		"rememberMe": true
	},
	"clientScopes": [
		{
			"name": "mobile",
			"description": "Mobile number",
			"protocol": "openid-connect",
			"protocolMappers": [
				{
					"name": "mobile number",
					"protocol": "openid-connect",
					"protocolMapper": "oidc-usermodel-attribute-mapper",
					"config": { "user.attribute": "mobile", "claim.name": "mobile" }
				}
			]
		}
	],
	"clients": [
		{
			"clientId": "web",
			"name": "Web",
			"enabled": true,
			"publicClient": true,
			"standardFlowEnabled": true,
			"redirectUris": ["https://web.acme.test/*"],
			"webOrigins": ["https://web.acme.test"],
			"defaultClientScopes": ["profile"],
			"optionalClientScopes": ["mobile"]
		}
	],
	"userProfile": {
		"roles": [{ "name": "admin", "description": "Administrators" }],
		"groups": [{ "name": "admins", "path": "/admins" }],
		"attributes": [
			{
				"name": "mobile",
				"displayName": "Mobile",
				"permissions": { "view": ["admin", "user"], "edit": ["admin", "user"] }
			}
		]
	}
}"#;

/// Admin API path for `suffix` inside the test realm.
pub fn realm_path(suffix: &str) -> String {
	format!("/admin/realms/{REALM}{suffix}")
}

pub fn connection_settings(server: &MockServer, attempts: u32) -> ConnectionSettings {
	ConnectionSettings::new(&server.base_url(), AdminCredentials::new("admin", "admin"))
		.expect("Test connection settings should be valid.")
		.with_readiness(
			ReadinessPolicy::default().with_attempts(attempts).with_interval(Duration::ZERO),
		)
}

pub fn blueprint() -> Blueprint {
	Blueprint::from_json_str(BLUEPRINT).expect("Test blueprint should be valid.")
}

pub async fn mock_ready(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(READY_PATH);
			then.status(200).body("{\"status\":\"UP\"}");
		})
		.await
}

pub async fn mock_token(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"bearer\",\"expires_in\":300}}"
			));
		})
		.await
}

/// Admin client that already passed readiness and holds a bearer token.
pub async fn connected_client(server: &MockServer) -> Arc<AdminClient> {
	mock_ready(server).await;
	mock_token(server).await;

	let client =
		AdminClient::new(connection_settings(server, 1)).expect("Admin client should build.");

	client.connect().await.expect("Mocked backend should accept the connection.");

	Arc::new(client)
}

pub async fn manager_context(server: &MockServer) -> ManagerContext {
	ManagerContext::new(connected_client(server).await, Arc::new(blueprint()))
}
