//! Roles, groups, and user-profile attributes.
//!
//! Everything here is best-effort on create: conflicts and failures are warnings. Destroy
//! removes roles only; groups are left for manual cleanup.

// self
use crate::{
	_prelude::*,
	admin::PostOutcome,
	blueprint::ProfileAttributeDescriptor,
	manager::{Checklist, ManagerContext, ManagerFuture, ResourceManager, guarded},
	obs,
	orchestrator::Action,
};

const MANUAL_PROFILE_SETUP: [&str; 2] = [
	"Admin Console > Realm Settings > User Profile",
	"Add the missing attributes with their validators",
];

/// Provisions realm roles, groups, and user-profile schema attributes.
#[derive(Clone, Debug)]
pub struct UserProfileManager {
	ctx: ManagerContext,
}
impl UserProfileManager {
	/// Label used in logs and reports.
	pub const NAME: &'static str = "user_profile";

	/// Builds the manager.
	pub fn new(ctx: ManagerContext) -> Self {
		Self { ctx }
	}

	async fn apply(&self) -> Result<bool> {
		self.create_roles().await;
		self.create_groups().await;
		self.configure_profile().await?;

		tracing::info!("User profile configuration completed.");

		Ok(true)
	}

	async fn create_roles(&self) {
		let realm = self.ctx.realm();

		for role in &self.ctx.blueprint.user_profile.roles {
			let payload = serde_json::json!({ "name": role.name, "description": role.description });

			match self.ctx.client.create_realm_role(realm, &payload).await {
				PostOutcome::Created(_) => tracing::info!(role = %role.name, "Role created."),
				PostOutcome::AlreadyExists =>
					tracing::warn!(role = %role.name, "Role already exists."),
				PostOutcome::Failed => tracing::warn!(role = %role.name, "Failed to create role."),
			}
		}
	}

	async fn create_groups(&self) {
		let realm = self.ctx.realm();

		for group in &self.ctx.blueprint.user_profile.groups {
			let payload = serde_json::json!({ "name": group.name, "path": group.path });

			match self.ctx.client.create_group(realm, &payload).await {
				PostOutcome::Created(_) => tracing::info!(group = %group.name, "Group created."),
				PostOutcome::AlreadyExists =>
					tracing::warn!(group = %group.name, "Group already exists."),
				PostOutcome::Failed =>
					tracing::warn!(group = %group.name, "Failed to create group."),
			}
		}
	}

	async fn configure_profile(&self) -> Result<()> {
		let attributes = &self.ctx.blueprint.user_profile.attributes;

		if attributes.is_empty() {
			return Ok(());
		}

		let realm = self.ctx.realm();
		let Some(mut profile) = self.ctx.client.get_user_profile(realm).await else {
			tracing::warn!("Could not read the user profile configuration.");
			log_manual_setup();

			return Ok(());
		};
		let added = match merge_attributes(&mut profile, attributes) {
			Ok(added) => added,
			Err(e) => {
				tracing::warn!(error = %e, "User profile configuration has an unexpected shape.");
				log_manual_setup();

				return Ok(());
			},
		};

		if added == 0 {
			tracing::info!("User profile already carries every attribute.");

			return Ok(());
		}
		if self.ctx.client.update_user_profile(realm, &profile).await {
			tracing::info!(added, "User profile configuration updated.");
		} else {
			tracing::warn!("Failed to update the user profile configuration.");
			log_manual_setup();
		}

		Ok(())
	}

	async fn remove(&self) -> Result<bool> {
		let realm = self.ctx.realm();

		for group in &self.ctx.blueprint.user_profile.groups {
			obs::skipped("group destruction", &group.name, "requires manual cleanup");
		}

		let mut success = true;

		for role in &self.ctx.blueprint.user_profile.roles {
			if self.ctx.client.delete_realm_role(realm, &role.name).await.is_success() {
				tracing::info!(role = %role.name, "Role deleted.");
			} else {
				tracing::warn!(role = %role.name, "Failed to delete role.");

				success = false;
			}
		}

		Ok(success)
	}

	async fn check(&self) -> Result<bool> {
		let client = &self.ctx.client;
		let realm = self.ctx.realm();
		let expected = &self.ctx.blueprint.user_profile;
		let mut checklist = Checklist::new(Self::NAME);

		for role in &expected.roles {
			let present = client.get_realm_role(realm, &role.name).await.is_some();

			checklist.require(&format!("role:{}", role.name), present);
		}
		for group in &expected.groups {
			let present = client.find_group(realm, &group.name).await.is_some();

			checklist.require(&format!("group:{}", group.name), present);
		}

		if !expected.attributes.is_empty() {
			match client.get_user_profile(realm).await {
				Some(profile) => {
					let live = attribute_names(&profile);

					checklist.check_contains(
						"attributes",
						&live,
						expected.attributes.iter().map(|attribute| attribute.name.as_str()),
					);
				},
				None => tracing::warn!(
					"User profile configuration is not readable; attribute checks skipped."
				),
			}
		}

		Ok(checklist.finish())
	}
}
impl ResourceManager for UserProfileManager {
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

fn log_manual_setup() {
	for (i, step) in MANUAL_PROFILE_SETUP.iter().enumerate() {
		tracing::info!("Manual setup step {}: {step}.", i + 1);
	}
}

fn attribute_names(profile: &Value) -> BTreeSet<&str> {
	profile
		.get("attributes")
		.and_then(Value::as_array)
		.map(|attributes| {
			attributes.iter().filter_map(|attribute| attribute.get("name")?.as_str()).collect()
		})
		.unwrap_or_default()
}

/// Appends attributes the profile lacks; returns how many were added.
fn merge_attributes(
	profile: &mut Value,
	attributes: &[ProfileAttributeDescriptor],
) -> Result<usize> {
	let Value::Object(fields) = profile else {
		return Err(Error::MalformedResponse {
			resource: "user profile",
			reason: "expected a JSON object".into(),
		});
	};
	let existing = fields.entry("attributes").or_insert_with(|| Value::Array(Vec::new()));
	let Value::Array(existing) = existing else {
		return Err(Error::MalformedResponse {
			resource: "user profile",
			reason: "`attributes` is not a list".into(),
		});
	};
	let mut added = 0;

	for attribute in attributes {
		let present = existing
			.iter()
			.any(|live| live.get("name").and_then(Value::as_str) == Some(attribute.name.as_str()));

		if present {
			tracing::info!(attribute = %attribute.name, "Profile attribute already exists.");

			continue;
		}

		existing.push(serde_json::to_value(attribute)?);
		tracing::info!(attribute = %attribute.name, "Profile attribute added.");

		added += 1;
	}

	Ok(added)
}
