// self
use crate::{obs::StepStatus, orchestrator::Action};

/// Records a step outcome via the global metrics recorder (when enabled).
pub fn record_step_outcome(action: Action, manager: &str, status: StepStatus) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"realm_provisioner_step_total",
			"phase" => action.as_str(),
			"manager" => manager.to_owned(),
			"outcome" => status.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (action, manager, status);
	}
}
