mod support;

// crates.io
use httpmock::prelude::*;
// self
use realm_provisioner::manager::{ClientScopeManager, ResourceManager};
use support::*;

async fn mock_scope_list(server: &MockServer, body: &'static str) {
	server
		.mock_async(|when, then| {
			when.method(GET).path(realm_path("/client-scopes"));
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;
}

#[tokio::test]
async fn create_posts_missing_scopes_and_their_mappers() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);
	let location = server.url(realm_path("/client-scopes/scope-9"));

	mock_scope_list(&server, "[]").await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(realm_path("/client-scopes"));
			then.status(201).header("location", location.as_str());
		})
		.await;
	let mapper = server
		.mock_async(|when, then| {
			when.method(POST).path(realm_path("/client-scopes/scope-9/protocol-mappers/models"));
			then.status(201);
		})
		.await;

	assert!(manager.create().await);

	create.assert_async().await;
	mapper.assert_async().await;
}

#[tokio::test]
async fn create_reuses_existing_scopes() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(&server, "[{\"id\":\"scope-1\",\"name\":\"mobile\"}]").await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path(realm_path("/client-scopes"));
			then.status(201);
		})
		.await;
	let mapper = server
		.mock_async(|when, then| {
			when.method(POST).path(realm_path("/client-scopes/scope-1/protocol-mappers/models"));
			then.status(409);
		})
		.await;

	assert!(manager.create().await);

	create.assert_calls_async(0).await;
	mapper.assert_async().await;
}

#[tokio::test]
async fn mapper_failures_do_not_fail_the_scope() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(&server, "[{\"id\":\"scope-1\",\"name\":\"mobile\"}]").await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(realm_path("/client-scopes/scope-1/protocol-mappers/models"));
			then.status(500);
		})
		.await;

	assert!(manager.create().await);
}

#[tokio::test]
async fn create_fails_when_a_scope_cannot_be_resolved() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(&server, "[]").await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(realm_path("/client-scopes"));
			then.status(500);
		})
		.await;

	assert!(!manager.create().await);
}

#[tokio::test]
async fn scope_ids_cover_managed_scopes_only() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(
		&server,
		"[{\"id\":\"scope-1\",\"name\":\"mobile\"},{\"id\":\"scope-2\",\"name\":\"roles\"}]",
	)
	.await;

	let ids = manager.scope_ids().await;

	assert_eq!(ids.keys().map(String::as_str).collect::<Vec<_>>(), ["mobile"]);
	assert_eq!(ids["mobile"].id, "scope-1");
}

#[tokio::test]
async fn destroy_deletes_existing_scopes_and_skips_missing_ones() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(&server, "[{\"id\":\"scope-1\",\"name\":\"mobile\"}]").await;

	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path(realm_path("/client-scopes/scope-1"));
			then.status(204);
		})
		.await;

	assert!(manager.destroy().await);

	delete.assert_async().await;

	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(&server, "[]").await;

	assert!(manager.destroy().await);
}

#[tokio::test]
async fn validate_requires_every_mapper() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(
		&server,
		"[{\"id\":\"scope-1\",\"name\":\"mobile\",\"description\":\"Mobile number\",\
		 \"protocol\":\"openid-connect\"}]",
	)
	.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(realm_path("/client-scopes/scope-1/protocol-mappers/models"));
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;

	assert!(!manager.validate().await);
}

#[tokio::test]
async fn validate_accepts_matching_scopes() {
	let server = MockServer::start_async().await;
	let manager = ClientScopeManager::new(manager_context(&server).await);

	mock_scope_list(
		&server,
		"[{\"id\":\"scope-1\",\"name\":\"mobile\",\"description\":\"Mobile number\",\
		 \"protocol\":\"openid-connect\"}]",
	)
	.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(realm_path("/client-scopes/scope-1/protocol-mappers/models"));
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"id\":\"m-1\",\"name\":\"mobile number\"}]");
		})
		.await;

	assert!(manager.validate().await);
}
