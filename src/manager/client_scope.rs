//! Client-scope manager.

// self
use crate::{
	_prelude::*,
	admin::{PostOutcome, RemoteHandle, ResourceKind},
	blueprint::ClientScopeDescriptor,
	manager::{Checklist, ManagerContext, ManagerFuture, ResourceManager, guarded},
	obs,
	orchestrator::Action,
};

/// Provisions every blueprint client scope and its protocol mappers.
///
/// Also serves the `scope name -> remote id` lookup client managers assign scopes with.
#[derive(Clone, Debug)]
pub struct ClientScopeManager {
	ctx: ManagerContext,
}
impl ClientScopeManager {
	/// Label used in logs and reports.
	pub const NAME: &'static str = "client_scopes";

	/// Builds the manager.
	pub fn new(ctx: ManagerContext) -> Self {
		Self { ctx }
	}

	/// Resolves every managed scope that currently exists to its remote handle.
	///
	/// Scopes the blueprint does not manage are never included, even when they exist remotely.
	pub async fn scope_ids(&self) -> BTreeMap<String, RemoteHandle> {
		let managed = self
			.ctx
			.blueprint
			.client_scopes
			.iter()
			.map(|scope| scope.name.as_str())
			.collect::<HashSet<_>>();
		let Some(live) = self.ctx.client.list_client_scopes(self.ctx.realm()).await else {
			return BTreeMap::new();
		};

		live.iter()
			.filter_map(|scope| {
				let name = scope.get("name").and_then(Value::as_str)?;

				if !managed.contains(name) {
					return None;
				}

				RemoteHandle::from_representation(ResourceKind::ClientScope, scope)
					.map(|handle| (name.to_owned(), handle))
			})
			.collect()
	}

	async fn lookup(&self, name: &str) -> Option<RemoteHandle> {
		let scope = self.ctx.client.find_client_scope(self.ctx.realm(), name).await?;

		RemoteHandle::from_representation(ResourceKind::ClientScope, &scope)
	}

	async fn apply(&self) -> Result<bool> {
		let mut success = true;

		for scope in &self.ctx.blueprint.client_scopes {
			success &= self.apply_scope(scope).await?;
		}

		if success {
			tracing::info!("All client scopes created.");
		} else {
			tracing::error!("Some client scopes failed to create.");
		}

		Ok(success)
	}

	async fn apply_scope(&self, scope: &ClientScopeDescriptor) -> Result<bool> {
		let client = &self.ctx.client;
		let realm = self.ctx.realm();
		let handle = match self.lookup(&scope.name).await {
			Some(handle) => {
				obs::skipped("client scope creation", &scope.name, "already exists");

				handle
			},
			None => {
				let outcome = client.create_client_scope(realm, &scope.creation_payload()).await;
				let handle = match &outcome {
					PostOutcome::Failed => None,
					PostOutcome::Created(created) => match &created.id {
						Some(id) => Some(RemoteHandle::new(ResourceKind::ClientScope, id.as_str())),
						None => self.lookup(&scope.name).await,
					},
					PostOutcome::AlreadyExists => self.lookup(&scope.name).await,
				};
				let Some(handle) = handle else {
					tracing::error!(scope = %scope.name, "Failed to create client scope.");

					return Ok(false);
				};

				tracing::info!(scope = %scope.name, id = %handle.id, "Client scope created.");

				handle
			},
		};

		for mapper in &scope.protocol_mappers {
			let payload = serde_json::to_value(mapper)?;

			match client.create_protocol_mapper(realm, &handle, &payload).await {
				PostOutcome::Created(_) => tracing::debug!(
					scope = %scope.name,
					mapper = %mapper.name,
					"Protocol mapper created."
				),
				PostOutcome::AlreadyExists => {},
				PostOutcome::Failed => tracing::warn!(
					scope = %scope.name,
					mapper = %mapper.name,
					"Failed to create protocol mapper."
				),
			}
		}

		Ok(true)
	}

	async fn remove(&self) -> Result<bool> {
		let mut success = true;

		for scope in &self.ctx.blueprint.client_scopes {
			let Some(handle) = self.lookup(&scope.name).await else {
				obs::skipped("client scope destruction", &scope.name, "does not exist");

				continue;
			};

			if self.ctx.client.delete_client_scope(self.ctx.realm(), &handle).await.is_success() {
				tracing::info!(scope = %scope.name, "Client scope deleted.");
			} else {
				tracing::error!(scope = %scope.name, "Failed to delete client scope.");

				success = false;
			}
		}

		if !success {
			tracing::warn!("Some client scopes failed to delete.");
		}

		Ok(success)
	}

	async fn check(&self) -> Result<bool> {
		let mut success = true;

		for scope in &self.ctx.blueprint.client_scopes {
			success &= self.check_scope(scope).await;
		}

		Ok(success)
	}

	async fn check_scope(&self, scope: &ClientScopeDescriptor) -> bool {
		let client = &self.ctx.client;
		let realm = self.ctx.realm();
		let Some(live) = client.find_client_scope(realm, &scope.name).await else {
			tracing::error!(scope = %scope.name, "Client scope not found.");

			return false;
		};
		let mut checklist = Checklist::new(&scope.name);

		checklist.check_eq(&live, "name", scope.name.as_str());
		checklist.check_eq(&live, "protocol", scope.protocol.as_str());
		checklist.check_eq(&live, "description", scope.description.as_str());

		if !scope.protocol_mappers.is_empty() {
			let mappers = match RemoteHandle::from_representation(ResourceKind::ClientScope, &live)
			{
				Some(handle) => client.list_protocol_mappers(realm, &handle).await,
				None => None,
			}
			.unwrap_or_default();
			let live_names =
				mappers.iter().filter_map(|mapper| mapper.get("name")?.as_str()).collect();

			checklist.check_contains(
				"protocolMappers",
				&live_names,
				scope.protocol_mappers.iter().map(|mapper| mapper.name.as_str()),
			);
		}

		checklist.finish()
	}
}
impl ResourceManager for ClientScopeManager {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn create(&self) -> ManagerFuture<'_> {
		Box::pin(guarded(Action::Create, Self::NAME, self.apply()))
	}

	fn destroy(&self) -> ManagerFuture<'_> {
		Box::pin(guarded(Action::Destroy, Self::NAME, self.remove()))
	}

	fn validate(&self) -> ManagerFuture<'_> {
		Box::pin(guarded(Action::Validate, Self::NAME, self.check()))
	}
}
