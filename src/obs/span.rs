// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
// self
use crate::{_prelude::*, orchestrator::Action};

/// Span wrapper used around each manager step.
#[derive(Clone, Debug)]
pub struct StepSpan {
	span: Span,
}
impl StepSpan {
	/// Creates a new span tagged with the life-cycle phase and manager name.
	pub fn new(action: Action, manager: &str) -> Self {
		let span = tracing::info_span!("realm_provisioner.step", phase = action.as_str(), manager);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}
