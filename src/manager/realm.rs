//! Realm manager.

// self
use crate::{
	_prelude::*,
	admin::PostOutcome,
	manager::{Checklist, ManagerContext, ManagerFuture, ResourceManager, guarded},
	obs,
	orchestrator::Action,
};

/// Creates, converges, deletes, and checks the realm itself.
#[derive(Clone, Debug)]
pub struct RealmManager {
	ctx: ManagerContext,
}
impl RealmManager {
	/// Label used in logs and reports.
	pub const NAME: &'static str = "realm";

	/// Builds the manager.
	pub fn new(ctx: ManagerContext) -> Self {
		Self { ctx }
	}

	fn payload(&self) -> Result<Value> {
		match &self.ctx.smtp {
			Some(smtp) => tracing::info!(host = %smtp.host, "SMTP configuration added to realm."),
			None =>
				tracing::warn!("SMTP configuration not available; email features stay disabled."),
		}

		self.ctx.blueprint.realm.payload(self.ctx.smtp.as_ref())
	}

	async fn apply(&self) -> Result<bool> {
		let client = &self.ctx.client;
		let realm = self.ctx.realm();

		if client.get_realm(realm).await.is_some() {
			obs::skipped("realm creation", realm, "already exists; updating instead");

			return self.converge().await;
		}

		match client.create_realm(&self.payload()?).await {
			PostOutcome::Created(_) => {
				tracing::info!(realm, "Realm created.");

				Ok(true)
			},
			PostOutcome::AlreadyExists => self.converge().await,
			PostOutcome::Failed => {
				tracing::error!(realm, "Failed to create realm.");

				Ok(false)
			},
		}
	}

	async fn converge(&self) -> Result<bool> {
		let realm = self.ctx.realm();
		let updated = self.ctx.client.update_realm(realm, &self.payload()?).await;

		if updated {
			tracing::info!(realm, "Realm configuration updated.");
		} else {
			tracing::error!(realm, "Failed to update realm configuration.");
		}

		Ok(updated)
	}

	async fn remove(&self) -> Result<bool> {
		let client = &self.ctx.client;
		let realm = self.ctx.realm();

		if client.get_realm(realm).await.is_none() {
			obs::skipped("realm destruction", realm, "does not exist");

			return Ok(true);
		}

		let deleted = client.delete_realm(realm).await.is_success();

		if deleted {
			tracing::info!(realm, "Realm deleted.");
		} else {
			tracing::error!(realm, "Failed to delete realm.");
		}

		Ok(deleted)
	}

	async fn check(&self) -> Result<bool> {
		let realm = self.ctx.realm();
		let Some(live) = self.ctx.client.get_realm(realm).await else {
			tracing::error!(realm, "Realm not found.");

			return Ok(false);
		};
		let expected = &self.ctx.blueprint.realm;
		let mut checklist = Checklist::new(Self::NAME);

		checklist.check_eq(&live, "enabled", expected.enabled);
		checklist.check_eq(&live, "displayName", expected.display_name.as_str());
		checklist.check_eq(&live, "registrationAllowed", expected.registration_allowed);
		checklist.check_eq(&live, "verifyEmail", expected.verify_email);
		checklist.check_eq(&live, "sslRequired", expected.ssl_required.as_str());

		if let Some(smtp) = &self.ctx.smtp {
			let host = live.pointer("/smtpServer/host").and_then(Value::as_str);

			checklist.require("smtpServer.host", host == Some(smtp.host.as_str()));
		}

		Ok(checklist.finish())
	}
}
impl ResourceManager for RealmManager {
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
