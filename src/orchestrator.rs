//! Dependency-ordered driver for the resource managers.
//!
//! The manager list is fixed at construction: realm, client scopes, each client, user profile.
//! Create walks it forward and stops at the first failure; destroy walks it backward and keeps
//! going; validate walks it forward and always runs every step.

// self
use crate::{
	_prelude::*,
	admin::AdminClient,
	blueprint::Blueprint,
	config::Settings,
	error::ConfigError,
	manager::{
		ClientManager, ClientScopeManager, ManagerContext, RealmManager, ResourceManager,
		UserProfileManager,
	},
	obs::{self, StepSpan, StepStatus},
};

/// Life-cycle action selected for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
	/// Create or converge every resource.
	Create,
	/// Delete every resource, best-effort.
	Destroy,
	/// Check live state against the blueprint.
	Validate,
}
impl Action {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Action::Create => "create",
			Action::Destroy => "destroy",
			Action::Validate => "validate",
		}
	}

	/// How a failing step affects the rest of the run.
	pub const fn failure_policy(self) -> FailurePolicy {
		match self {
			Action::Create => FailurePolicy::FailFast,
			Action::Destroy | Action::Validate => FailurePolicy::ContinueOnError,
		}
	}

	/// Destroy runs the manager list in reverse.
	pub const fn is_reversed(self) -> bool {
		matches!(self, Action::Destroy)
	}
}
impl Display for Action {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Action {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"create" => Ok(Action::Create),
			"destroy" => Ok(Action::Destroy),
			"validate" => Ok(Action::Validate),
			_ => Err(ConfigError::UnknownAction { action: s.to_owned() }),
		}
	}
}

/// What happens to the remaining steps after one fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
	/// Stop; later steps are reported as not attempted.
	FailFast,
	/// Keep going; the run fails if any step failed.
	ContinueOnError,
}

/// Result of one manager step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
	/// The manager reported success.
	Succeeded,
	/// The manager reported failure.
	Failed,
	/// An earlier failure stopped the run first.
	NotAttempted,
}

/// One manager's entry in a [`RunReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
	/// Manager label.
	pub manager: String,
	/// Step result.
	pub outcome: StepOutcome,
}

/// Per-step record of a run, in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
	/// Action that was run.
	pub action: Action,
	/// Steps in the order they were (or would have been) executed.
	pub steps: Vec<StepReport>,
}
impl RunReport {
	/// True when every step succeeded.
	pub fn is_success(&self) -> bool {
		self.steps.iter().all(|step| step.outcome == StepOutcome::Succeeded)
	}

	/// Labels of the steps that failed.
	pub fn failed_steps(&self) -> impl Iterator<Item = &str> {
		self.steps
			.iter()
			.filter(|step| step.outcome == StepOutcome::Failed)
			.map(|step| step.manager.as_str())
	}

	/// Labels of the steps in execution order.
	pub fn executed_order(&self) -> impl Iterator<Item = &str> {
		self.steps
			.iter()
			.filter(|step| step.outcome != StepOutcome::NotAttempted)
			.map(|step| step.manager.as_str())
	}
}

/// Owns the ordered manager list and runs life-cycle actions across it.
pub struct Orchestrator {
	managers: Vec<Box<dyn ResourceManager>>,
}
impl Orchestrator {
	/// Connects to the backend, then builds the standard manager list.
	///
	/// No manager is constructed when the connection fails.
	pub async fn initialize(settings: &Settings, blueprint: Blueprint) -> Result<Self> {
		tracing::info!(server = %settings.connection.server_url, "Initializing orchestrator.");

		let client = Arc::new(AdminClient::new(settings.connection.clone())?);

		client.connect().await?;

		let ctx = ManagerContext::new(client, Arc::new(blueprint)).with_smtp(settings.smtp.clone());
		let orchestrator = Self::with_managers(Self::standard_managers(ctx));

		tracing::info!(managers = orchestrator.managers.len(), "Orchestrator initialized.");

		Ok(orchestrator)
	}

	/// Realm, client scopes, one manager per client in blueprint order, user profile.
	pub fn standard_managers(ctx: ManagerContext) -> Vec<Box<dyn ResourceManager>> {
		let scopes = ClientScopeManager::new(ctx.clone());
		let mut managers: Vec<Box<dyn ResourceManager>> =
			vec![Box::new(RealmManager::new(ctx.clone())), Box::new(scopes.clone())];

		for descriptor in &ctx.blueprint.clients {
			managers.push(Box::new(ClientManager::new(
				ctx.clone(),
				descriptor.clone(),
				scopes.clone(),
			)));
		}

		managers.push(Box::new(UserProfileManager::new(ctx)));

		managers
	}

	/// Uses an explicit manager list, in forward order.
	pub fn with_managers(managers: Vec<Box<dyn ResourceManager>>) -> Self {
		Self { managers }
	}

	/// Manager labels in forward order.
	pub fn manager_names(&self) -> Vec<&str> {
		self.managers.iter().map(|manager| manager.name()).collect()
	}

	/// Runs `action` with its order and failure policy.
	pub async fn run(&self, action: Action) -> RunReport {
		match action {
			Action::Create => self.create_configuration().await,
			Action::Destroy => self.destroy_configuration().await,
			Action::Validate => self.validate_configuration().await,
		}
	}

	/// Forward order, stopping at the first failure.
	pub async fn create_configuration(&self) -> RunReport {
		self.run_steps(Action::Create).await
	}

	/// Reverse order, continuing past failures.
	pub async fn destroy_configuration(&self) -> RunReport {
		self.run_steps(Action::Destroy).await
	}

	/// Forward order, every step runs.
	pub async fn validate_configuration(&self) -> RunReport {
		self.run_steps(Action::Validate).await
	}

	async fn run_steps(&self, action: Action) -> RunReport {
		let policy = action.failure_policy();
		let ordered: Vec<&dyn ResourceManager> = if action.is_reversed() {
			self.managers.iter().rev().map(|manager| &**manager).collect()
		} else {
			self.managers.iter().map(|manager| &**manager).collect()
		};
		let total = ordered.len();
		let mut steps = Vec::with_capacity(total);
		let mut halted = false;

		tracing::info!(action = action.as_str(), steps = total, "Starting run.");

		for (i, manager) in ordered.into_iter().enumerate() {
			let name = manager.name();

			if halted {
				steps.push(StepReport {
					manager: name.to_owned(),
					outcome: StepOutcome::NotAttempted,
				});

				continue;
			}

			tracing::info!(action = action.as_str(), manager = name, "Step {}/{total}.", i + 1);
			obs::record_step_outcome(action, name, StepStatus::Attempt);

			let success = StepSpan::new(action, name).instrument(manager.run(action)).await;

			obs::record_step_outcome(action, name, StepStatus::from_success(success));

			let outcome = if success {
				StepOutcome::Succeeded
			} else {
				match policy {
					FailurePolicy::FailFast => {
						tracing::error!(manager = name, "Step failed; aborting the run.");

						halted = true;
					},
					FailurePolicy::ContinueOnError => {
						tracing::warn!(manager = name, "Step failed; continuing.")
					},
				}

				StepOutcome::Failed
			};

			steps.push(StepReport { manager: name.to_owned(), outcome });
		}

		let report = RunReport { action, steps };

		if report.is_success() {
			tracing::info!(action = action.as_str(), "Run completed successfully.");
		} else {
			tracing::error!(
				action = action.as_str(),
				failed = ?report.failed_steps().collect::<Vec<_>>(),
				"Run failed."
			);
		}

		report
	}
}
impl Debug for Orchestrator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Orchestrator").field("managers", &self.manager_names()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn actions_parse_case_insensitively() {
		assert_eq!("create".parse::<Action>().expect("Action should parse."), Action::Create);
		assert_eq!(" Destroy ".parse::<Action>().expect("Action should parse."), Action::Destroy);
		assert_eq!("VALIDATE".parse::<Action>().expect("Action should parse."), Action::Validate);

		let err = "deploy".parse::<Action>().expect_err("Unknown actions should fail.");

		assert!(matches!(err, ConfigError::UnknownAction { ref action } if action == "deploy"));
	}

	#[test]
	fn policies_follow_the_action() {
		assert_eq!(Action::Create.failure_policy(), FailurePolicy::FailFast);
		assert_eq!(Action::Destroy.failure_policy(), FailurePolicy::ContinueOnError);
		assert_eq!(Action::Validate.failure_policy(), FailurePolicy::ContinueOnError);
		assert!(Action::Destroy.is_reversed());
		assert!(!Action::Validate.is_reversed());
	}

	#[test]
	fn not_attempted_steps_fail_the_report() {
		let report = RunReport {
			action: Action::Create,
			steps: vec![
				StepReport { manager: "realm".into(), outcome: StepOutcome::Failed },
				StepReport { manager: "client_scopes".into(), outcome: StepOutcome::NotAttempted },
			],
		};

		assert!(!report.is_success());
		assert_eq!(report.failed_steps().collect::<Vec<_>>(), ["realm"]);
		assert_eq!(report.executed_order().collect::<Vec<_>>(), ["realm"]);
	}
}
