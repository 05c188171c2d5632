mod support;

// crates.io
use httpmock::prelude::*;
// self
use realm_provisioner::{
	config::SmtpParts,
	manager::{RealmManager, ResourceManager},
};
use support::*;

const LIVE_REALM: &str = "{\"realm\":\"acme\",\"displayName\":\"Acme\",\"enabled\":true,\
	\"sslRequired\":\"external\",\"registrationAllowed\":true,\"verifyEmail\":true}";

async fn mock_live_realm<'a>(server: &'a MockServer, body: &'static str) -> httpmock::Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(realm_path(""));
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

async fn mock_missing_realm(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(realm_path(""));
			then.status(404);
		})
		.await
}

#[tokio::test]
async fn create_posts_a_missing_realm() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_missing_realm(&server).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/realms").header("authorization", BEARER);
			then.status(201).header("location", "http://kc/admin/realms/acme");
		})
		.await;

	assert!(manager.create().await);

	create.assert_async().await;
}

#[tokio::test]
async fn create_converges_an_existing_realm() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_live_realm(&server, LIVE_REALM).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/realms");
			then.status(201);
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path(realm_path(""));
			then.status(204);
		})
		.await;

	assert!(manager.create().await);

	create.assert_calls_async(0).await;
	update.assert_async().await;
}

#[tokio::test]
async fn create_converges_after_a_conflict() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_missing_realm(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/realms");
			then.status(409).body("{\"errorMessage\":\"Conflict detected.\"}");
		})
		.await;

	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path(realm_path(""));
			then.status(204);
		})
		.await;

	assert!(manager.create().await);

	update.assert_async().await;
}

#[tokio::test]
async fn create_fails_when_the_backend_rejects_the_realm() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_missing_realm(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/realms");
			then.status(500).body("{\"error\":\"unknown_error\"}");
		})
		.await;

	assert!(!manager.create().await);
}

#[tokio::test]
async fn destroy_treats_a_missing_realm_as_done() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_missing_realm(&server).await;

	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path(realm_path(""));
			then.status(204);
		})
		.await;

	assert!(manager.destroy().await);

	delete.assert_calls_async(0).await;
}

#[tokio::test]
async fn destroy_deletes_an_existing_realm() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_live_realm(&server, LIVE_REALM).await;

	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path(realm_path(""));
			then.status(204);
		})
		.await;

	assert!(manager.destroy().await);

	delete.assert_async().await;
}

#[tokio::test]
async fn validate_accepts_matching_state() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_live_realm(&server, LIVE_REALM).await;

	assert!(manager.validate().await);
}

#[tokio::test]
async fn validate_reports_drift() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_live_realm(
		&server,
		"{\"realm\":\"acme\",\"displayName\":\"Acme Corp\",\"enabled\":true,\
		 \"sslRequired\":\"external\",\"registrationAllowed\":true,\"verifyEmail\":true}",
	)
	.await;

	assert!(!manager.validate().await);
}

#[tokio::test]
async fn validate_fails_for_a_missing_realm() {
	let server = MockServer::start_async().await;
	let manager = RealmManager::new(manager_context(&server).await);

	mock_missing_realm(&server).await;

	assert!(!manager.validate().await);
}

#[tokio::test]
async fn validate_checks_the_smtp_host_when_configured() {
	let server = MockServer::start_async().await;
	let smtp = SmtpParts {
		host: Some("smtp.acme.test".into()),
		user: Some("mailer".into()),
		password: Some("pw".into()),
		..Default::default()
	}
	.resolve();
	let manager = RealmManager::new(manager_context(&server).await.with_smtp(smtp));

	mock_live_realm(&server, LIVE_REALM).await;

	assert!(!manager.validate().await);
}
