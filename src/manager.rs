//! Uniform `{create, destroy, validate}` contract over one resource family.
//!
//! Manager bodies are ordinary `async fn ... -> Result<bool>`; [`guarded`] is the operation
//! boundary that logs an `Err` with the operation name and turns it into `false`, so nothing
//! but a boolean ever reaches the orchestrator.

pub mod client;
pub mod client_scope;
pub mod realm;
pub mod user_profile;

pub use client::ClientManager;
pub use client_scope::ClientScopeManager;
pub use realm::RealmManager;
pub use user_profile::UserProfileManager;

// self
use crate::{
	_prelude::*, admin::AdminClient, blueprint::Blueprint, config::SmtpSettings,
	orchestrator::Action,
};

/// Boxed future returned by [`ResourceManager`] operations.
pub type ManagerFuture<'a> = Pin<Box<dyn Future<Output = bool> + 'a + Send>>;

/// One resource family's life-cycle operations.
///
/// Implementations must never panic on remote failures; every outcome is reported as a bool.
pub trait ResourceManager: Send + Sync {
	/// Stable label used in logs, spans, and reports.
	fn name(&self) -> &str;

	/// Creates the resource or converges an existing one.
	fn create(&self) -> ManagerFuture<'_>;

	/// Deletes the resource; absence counts as success.
	fn destroy(&self) -> ManagerFuture<'_>;

	/// Compares live state against the blueprint; absence is a failure.
	fn validate(&self) -> ManagerFuture<'_>;

	/// Dispatches to the operation matching `action`.
	fn run(&self, action: Action) -> ManagerFuture<'_> {
		match action {
			Action::Create => self.create(),
			Action::Destroy => self.destroy(),
			Action::Validate => self.validate(),
		}
	}
}

/// Collaborators shared by every manager of a run.
#[derive(Clone, Debug)]
pub struct ManagerContext {
	/// Connected admin client.
	pub client: Arc<AdminClient>,
	/// Desired state.
	pub blueprint: Arc<Blueprint>,
	/// SMTP block for the realm, when fully configured.
	pub smtp: Option<SmtpSettings>,
}
impl ManagerContext {
	/// Bundles the run's collaborators.
	pub fn new(client: Arc<AdminClient>, blueprint: Arc<Blueprint>) -> Self {
		Self { client, blueprint, smtp: None }
	}

	/// Attaches SMTP settings for the realm manager.
	pub fn with_smtp(mut self, smtp: Option<SmtpSettings>) -> Self {
		self.smtp = smtp;

		self
	}

	/// Name of the realm every manager works in.
	pub fn realm(&self) -> &str {
		&self.blueprint.realm.realm
	}
}

/// Runs a manager body, logging and collapsing any error into `false`.
pub async fn guarded<F>(action: Action, manager: &str, body: F) -> bool
where
	F: Future<Output = Result<bool>>,
{
	match body.await {
		Ok(success) => success,
		Err(e) => {
			tracing::error!(
				manager,
				operation = action.as_str(),
				error = %e,
				"Manager operation failed."
			);

			false
		},
	}
}

/// Exhaustive property checklist: every check runs and is logged; the result is their AND.
#[derive(Debug)]
pub struct Checklist<'a> {
	subject: &'a str,
	passed: bool,
}
impl<'a> Checklist<'a> {
	/// Starts a checklist for one live resource.
	pub fn new(subject: &'a str) -> Self {
		Self { subject, passed: true }
	}

	/// Scalar equality between the live representation and the expected value.
	pub fn check_eq(&mut self, live: &Value, property: &str, expected: impl Into<Value>) -> bool {
		let expected = expected.into();
		let actual = live.get(property).unwrap_or(&Value::Null);

		if *actual == expected {
			tracing::debug!(subject = self.subject, property, actual = %actual, "Check passed.");

			true
		} else {
			tracing::error!(
				subject = self.subject,
				property,
				expected = %expected,
				actual = %actual,
				"Check failed."
			);

			self.passed = false;

			false
		}
	}

	/// Boolean flag; the backend omits some flags when they are off, so absence reads as
	/// `false`.
	pub fn check_flag(&mut self, live: &Value, property: &str, expected: bool) -> bool {
		let actual = live.get(property).and_then(Value::as_bool).unwrap_or(false);

		self.require(property, actual == expected)
	}

	/// Set inclusion: every expected string must appear in the live array.
	pub fn check_subset(&mut self, live: &Value, property: &str, expected: &[String]) -> bool {
		let actual = live
			.get(property)
			.and_then(Value::as_array)
			.map(|items| items.iter().filter_map(Value::as_str).collect::<BTreeSet<_>>())
			.unwrap_or_default();

		self.check_contains(property, &actual, expected.iter().map(String::as_str))
	}

	/// Set inclusion against an already-collected live set.
	pub fn check_contains<'e>(
		&mut self,
		property: &str,
		actual: &BTreeSet<&str>,
		expected: impl IntoIterator<Item = &'e str>,
	) -> bool {
		let missing =
			expected.into_iter().filter(|item| !actual.contains(item)).collect::<Vec<_>>();

		if missing.is_empty() {
			tracing::debug!(subject = self.subject, property, "Check passed.");

			true
		} else {
			tracing::error!(subject = self.subject, property, missing = ?missing, "Check failed.");

			self.passed = false;

			false
		}
	}

	/// Records a precomputed check.
	pub fn require(&mut self, property: &str, ok: bool) -> bool {
		if ok {
			tracing::debug!(subject = self.subject, property, "Check passed.");
		} else {
			tracing::error!(subject = self.subject, property, "Check failed.");

			self.passed = false;
		}

		ok
	}

	/// Returns true when every check passed.
	pub fn finish(self) -> bool {
		if self.passed {
			tracing::info!(subject = self.subject, "Validation passed.");
		} else {
			tracing::error!(subject = self.subject, "Validation failed.");
		}

		self.passed
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn checklist_runs_every_check() {
		let live = serde_json::json!({
			"enabled": true,
			"serviceAccountsEnabled": false,
			"redirectUris": ["https://a/*", "https://b/*", "https://extra/*"],
		});
		let mut checklist = Checklist::new("client");

		assert!(checklist.check_eq(&live, "enabled", true));
		assert!(!checklist.check_eq(&live, "serviceAccountsEnabled", true));
		assert!(checklist.check_subset(
			&live,
			"redirectUris",
			&["https://a/*".to_owned(), "https://b/*".to_owned()]
		));
		assert!(!checklist.check_subset(&live, "webOrigins", &["https://a".to_owned()]));
		assert!(checklist.check_flag(&live, "authorizationServicesEnabled", false));
		assert!(!checklist.finish());
	}

	#[test]
	fn missing_properties_compare_as_null() {
		let mut checklist = Checklist::new("realm");

		assert!(!checklist.check_eq(&serde_json::json!({}), "displayName", "Acme"));
		assert!(checklist.check_subset(&serde_json::json!({}), "webOrigins", &[]));
	}

	#[tokio::test]
	async fn guarded_turns_errors_into_false() {
		assert!(guarded(Action::Create, "realm", async { Ok(true) }).await);
		assert!(!guarded(Action::Create, "realm", async { Err(Error::NotConnected) }).await);
	}
}
