// self
use crate::{error::ExchangeStep, obs::ExchangeOutcome};

/// Records an exchange step outcome via the global metrics recorder (when enabled).
pub fn record_exchange_outcome(step: ExchangeStep, outcome: ExchangeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"wecom_connector_exchange_total",
			"step" => step.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (step, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_exchange_outcome_noop_without_metrics() {
		record_exchange_outcome(ExchangeStep::TokenExchange, ExchangeOutcome::Failure);
	}
}
