//! Optional observability helpers for request dispatch and token refresh.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `bearer_guard.dispatch` with the `endpoint`
//!   and `stage` fields, plus debug events for every retry-state transition.
//! - Enable `metrics` to increment the `bearer_guard_refresh_total` counter for every refresh
//!   attempt/success/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// A 401 triggered a refresh call.
	Attempt,
	/// Renewed tokens were received and persisted.
	Success,
	/// The refresh call or persistence failed.
	Failure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
