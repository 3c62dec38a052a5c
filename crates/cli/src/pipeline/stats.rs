//! Watch run statistics.

use std::time::Duration;

use dispatcher::{DestinationOutcome, MetricsSnapshot};

/// Statistics from one watch run
#[derive(Debug, Default)]
pub struct RunStats {
    /// Postings returned by the upstream API
    pub fetched: usize,

    /// Postings left after the pattern filter
    pub matched: usize,

    /// Postings absent from the prior snapshot
    pub new_postings: usize,

    /// Whether this run only recorded the baseline snapshot
    pub baseline: bool,

    /// Per-destination results, in dispatch order
    pub outcomes: Vec<DestinationOutcome>,

    /// Dispatcher counters
    pub delivery: MetricsSnapshot,

    /// Total duration of the run
    pub duration: Duration,
}

impl RunStats {
    /// Names of destinations whose delivery failed
    pub fn failed_destinations(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.destination.clone())
            .collect()
    }

    /// Print the per-destination summary
    pub fn print_summary(&self) {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(report) if report.messages_sent == 0 => {
                    println!("  {}: nothing to send", outcome.destination)
                }
                Ok(report) => println!(
                    "  {}: {} posting(s) in {} message(s)",
                    outcome.destination, report.postings_sent, report.messages_sent
                ),
                Err(e) => println!("  {}: FAILED ({e})", outcome.destination),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatcher::{DispatchReport, DispatcherError};

    #[test]
    fn test_failed_destinations() {
        let stats = RunStats {
            outcomes: vec![
                DestinationOutcome {
                    destination: "slack".into(),
                    result: Ok(DispatchReport::default()),
                },
                DestinationOutcome {
                    destination: "discord".into(),
                    result: Err(DispatcherError::destination_creation("discord", "boom")),
                },
            ],
            ..Default::default()
        };

        assert_eq!(stats.failed_destinations(), vec!["discord".to_string()]);
    }
}
