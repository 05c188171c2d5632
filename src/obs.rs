//! Observability helpers for provisioning runs.
//!
//! - Every manager step runs inside a span named `realm_provisioner.step` carrying the
//!   `phase` and `manager` fields.
//! - Enable `metrics` to increment the `realm_provisioner_step_total` counter for every
//!   attempt/success/failure, labeled by `phase`, `manager`, and `outcome`.
//! - [`init_logging`] installs the process-wide `tracing-subscriber` formatter.

mod logging;
mod metrics;
mod span;

pub use logging::*;
pub use metrics::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each manager step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepStatus {
	/// Entry to a manager operation.
	Attempt,
	/// Operation reported success.
	Success,
	/// Operation reported failure.
	Failure,
}
impl StepStatus {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StepStatus::Attempt => "attempt",
			StepStatus::Success => "success",
			StepStatus::Failure => "failure",
		}
	}

	/// Maps a manager's boolean result onto a terminal status.
	pub const fn from_success(success: bool) -> Self {
		if success { StepStatus::Success } else { StepStatus::Failure }
	}
}
impl Display for StepStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs that an operation on `subject` was deliberately not performed.
pub fn skipped(operation: &str, subject: &str, reason: &str) {
	tracing::info!(operation, subject, reason, outcome = "skipped", "Operation skipped.");
}
