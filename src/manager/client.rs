//! OAuth client manager; one instance per blueprint client.

// self
use crate::{
	_prelude::*,
	admin::{PostOutcome, RemoteHandle, ResourceKind},
	blueprint::ClientDescriptor,
	manager::{
		Checklist, ClientScopeManager, ManagerContext, ManagerFuture, ResourceManager, guarded,
	},
	obs,
	orchestrator::Action,
};

#[derive(Clone, Copy, Debug)]
enum Assignment {
	Default,
	Optional,
}
impl Assignment {
	const fn as_str(self) -> &'static str {
		match self {
			Assignment::Default => "default",
			Assignment::Optional => "optional",
		}
	}
}

/// Creates or converges one client, then assigns its default and optional scopes.
#[derive(Clone, Debug)]
pub struct ClientManager {
	ctx: ManagerContext,
	descriptor: ClientDescriptor,
	scopes: ClientScopeManager,
}
impl ClientManager {
	/// Builds a manager for `descriptor`, resolving scope names through `scopes`.
	pub fn new(
		ctx: ManagerContext,
		descriptor: ClientDescriptor,
		scopes: ClientScopeManager,
	) -> Self {
		Self { ctx, descriptor, scopes }
	}

	/// Client this manager provisions.
	pub fn descriptor(&self) -> &ClientDescriptor {
		&self.descriptor
	}

	async fn lookup(&self) -> Option<(RemoteHandle, Value)> {
		let live = self.ctx.client.find_client(self.ctx.realm(), &self.descriptor.client_id).await?;
		let handle = RemoteHandle::from_representation(ResourceKind::Client, &live)?;

		Some((handle, live))
	}

	async fn apply(&self) -> Result<bool> {
		let client = &self.ctx.client;
		let realm = self.ctx.realm();
		let client_id = self.descriptor.client_id.as_str();
		let handle = match self.lookup().await {
			Some((handle, _)) => {
				obs::skipped("client creation", client_id, "already exists; updating instead");

				if !client.update_client(realm, &handle, &self.descriptor.update_payload()).await {
					tracing::error!(client_id, "Failed to update client configuration.");

					return Ok(false);
				}

				tracing::info!(client_id, "Client configuration updated.");

				handle
			},
			None => {
				let payload = self.descriptor.creation_payload()?;
				let outcome = client.create_client(realm, &payload).await;
				let handle = match outcome.created_id() {
					Some(id) => Some(RemoteHandle::new(ResourceKind::Client, id)),
					None if outcome.is_success() => self.lookup().await.map(|(handle, _)| handle),
					None => None,
				};
				let Some(handle) = handle else {
					tracing::error!(client_id, "Failed to create client.");

					return Ok(false);
				};

				if matches!(outcome, PostOutcome::Created(_)) {
					tracing::info!(client_id, id = %handle.id, "Client created.");
				}

				handle
			},
		};

		self.assign_scopes(&handle).await;

		tracing::info!(client_id, "Client configuration completed.");

		Ok(true)
	}

	async fn assign_scopes(&self, handle: &RemoteHandle) {
		let scope_ids = self.scopes.scope_ids().await;
		let defaults =
			self.descriptor.default_client_scopes.iter().map(|name| (Assignment::Default, name));
		let optionals =
			self.descriptor.optional_client_scopes.iter().map(|name| (Assignment::Optional, name));

		for (assignment, name) in defaults.chain(optionals) {
			let Some(scope) = scope_ids.get(name) else {
				tracing::debug!(
					client_id = %self.descriptor.client_id,
					scope = %name,
					assignment = assignment.as_str(),
					"Scope is not managed here; assignment skipped."
				);

				continue;
			};
			let realm = self.ctx.realm();
			let assigned = match assignment {
				Assignment::Default =>
					self.ctx.client.assign_default_client_scope(realm, handle, scope).await,
				Assignment::Optional =>
					self.ctx.client.assign_optional_client_scope(realm, handle, scope).await,
			};

			if assigned {
				tracing::debug!(
					client_id = %self.descriptor.client_id,
					scope = %name,
					assignment = assignment.as_str(),
					"Scope assigned."
				);
			} else {
				tracing::warn!(
					client_id = %self.descriptor.client_id,
					scope = %name,
					assignment = assignment.as_str(),
					"Failed to assign scope."
				);
			}
		}
	}

	async fn remove(&self) -> Result<bool> {
		let client_id = self.descriptor.client_id.as_str();
		let Some((handle, _)) = self.lookup().await else {
			obs::skipped("client destruction", client_id, "does not exist");

			return Ok(true);
		};
		let deleted = self.ctx.client.delete_client(self.ctx.realm(), &handle).await.is_success();

		if deleted {
			tracing::info!(client_id, "Client deleted.");
		} else {
			tracing::error!(client_id, "Failed to delete client.");
		}

		Ok(deleted)
	}

	async fn check(&self) -> Result<bool> {
		let expected = &self.descriptor;
		let Some((_, live)) = self.lookup().await else {
			tracing::error!(client_id = %expected.client_id, "Client not found.");

			return Ok(false);
		};
		let mut checklist = Checklist::new(&expected.client_id);

		checklist.check_flag(&live, "enabled", expected.enabled);
		checklist.check_flag(&live, "publicClient", expected.public_client);
		checklist.check_flag(&live, "serviceAccountsEnabled", expected.service_accounts_enabled);
		checklist.check_flag(
			&live,
			"authorizationServicesEnabled",
			expected.authorization_services_enabled,
		);
		checklist.check_subset(&live, "redirectUris", &expected.redirect_uris);
		checklist.check_subset(&live, "webOrigins", &expected.web_origins);

		Ok(checklist.finish())
	}
}
impl ResourceManager for ClientManager {
	fn name(&self) -> &str {
		&self.descriptor.client_id
	}

	fn create(&self) -> ManagerFuture<'_> {
		Box::pin(guarded(Action::Create, self.name(), self.apply()))
	}

	fn destroy(&self) -> ManagerFuture<'_> {
		Box::pin(guarded(Action::Destroy, self.name(), self.remove()))
	}

	fn validate(&self) -> ManagerFuture<'_> {
		Box::pin(guarded(Action::Validate, self.name(), self.check()))
	}
}
