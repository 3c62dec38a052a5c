//! Dispatcher - delivers new postings to each destination

use std::borrow::Cow;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use contracts::{DestinationConfig, NotificationBatch, Notifier, Posting};
use state_store::DeliveryHistory;

use crate::batch::plan_batches;
use crate::error::DispatcherError;
use crate::metrics::DispatchMetrics;
use crate::sinks::Destination;

/// Result of a successful delivery to one destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub destination: String,
    pub messages_sent: usize,
    pub postings_sent: usize,
    /// Postings dropped because the history already had them
    pub already_delivered: usize,
}

/// Per-destination outcome of `dispatch_all`
#[derive(Debug)]
pub struct DestinationOutcome {
    pub destination: String,
    pub result: Result<DispatchReport, DispatcherError>,
}

/// Delivers postings, consulting and updating the delivery history
pub struct Dispatcher {
    history: DeliveryHistory,
    metrics: DispatchMetrics,
}

impl Dispatcher {
    pub fn new(history: DeliveryHistory) -> Self {
        Self {
            history,
            metrics: DispatchMetrics::new(),
        }
    }

    pub fn history(&self) -> &DeliveryHistory {
        &self.history
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Deliver `postings` to one destination
    ///
    /// Batches go out sequentially in posting order. The first rejected
    /// batch stops the destination; postings of earlier accepted batches are
    /// still recorded in the history, the rejected and later ones are not.
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, destination, postings),
        fields(destination = %destination.name(), org = %organization_id, input = postings.len())
    )]
    pub async fn dispatch<N: Notifier>(
        &self,
        destination: &mut N,
        postings: &[Posting],
        organization_id: &str,
    ) -> Result<DispatchReport, DispatcherError> {
        let name = destination.name().to_string();
        let policy = destination.policy();
        let mut report = DispatchReport {
            destination: name.clone(),
            ..Default::default()
        };

        if postings.is_empty() {
            return Ok(report);
        }

        let pending: Cow<'_, [Posting]> = if policy.uses_history {
            let undelivered = self.history.filter_undelivered(&name, postings);
            report.already_delivered = postings.len() - undelivered.len();
            self.metrics.add_deduplicated(report.already_delivered);
            Cow::Owned(undelivered)
        } else {
            Cow::Borrowed(postings)
        };

        if pending.is_empty() {
            info!(
                already_delivered = report.already_delivered,
                "Nothing new for destination"
            );
            return Ok(report);
        }

        let total = pending.len();
        for planned in plan_batches(&pending, policy.batch_limit) {
            let batch = NotificationBatch {
                organization_id,
                total,
                range: planned.range,
                postings: planned.postings,
            };
            let payload = destination.render(&batch);

            if let Err(source) = destination.send(&payload).await {
                self.metrics.inc_failure_count();
                if policy.uses_history && report.postings_sent > 0 {
                    let sent = &pending[..report.postings_sent];
                    if let Err(e) = self
                        .history
                        .mark_delivered(&name, sent.iter().map(|p| p.id.as_str()))
                    {
                        warn!(error = %e, "Could not record postings sent before the failure");
                    }
                }
                return Err(DispatcherError::Delivery {
                    destination: name,
                    range: planned.range,
                    sent_before_failure: report.postings_sent,
                    source,
                });
            }

            self.metrics.record_message(planned.postings.len());
            report.messages_sent += 1;
            report.postings_sent += planned.postings.len();
        }

        if policy.uses_history {
            self.history
                .mark_delivered(&name, pending.iter().map(|p| p.id.as_str()))
                .map_err(|source| {
                    self.metrics.inc_failure_count();
                    DispatcherError::History {
                        destination: name.clone(),
                        source,
                    }
                })?;
        }

        info!(
            messages = report.messages_sent,
            postings = report.postings_sent,
            already_delivered = report.already_delivered,
            "Destination delivered"
        );
        Ok(report)
    }

    /// Deliver to every destination in order
    ///
    /// A failing destination is logged and reported; the rest still run.
    #[instrument(
        name = "dispatcher_dispatch_all",
        skip(self, destinations, postings),
        fields(destinations = destinations.len(), org = %organization_id)
    )]
    pub async fn dispatch_all<N: Notifier>(
        &self,
        destinations: &mut [N],
        postings: &[Posting],
        organization_id: &str,
    ) -> Vec<DestinationOutcome> {
        let mut outcomes = Vec::with_capacity(destinations.len());
        for destination in destinations.iter_mut() {
            let name = destination.name().to_string();
            let result = self.dispatch(destination, postings, organization_id).await;
            if let Err(e) = &result {
                error!(destination = %name, error = %e, "Destination failed");
            }
            outcomes.push(DestinationOutcome {
                destination: name,
                result,
            });
        }
        outcomes
    }
}

/// Build destinations from configuration, skipping disabled ones
#[instrument(name = "dispatcher_create_destinations", skip(configs), fields(configured = configs.len()))]
pub fn create_destinations(
    configs: &[DestinationConfig],
    timeout: Duration,
) -> Result<Vec<Destination>, DispatcherError> {
    let mut destinations = Vec::with_capacity(configs.len());
    for config in configs {
        match Destination::from_config(config, timeout)? {
            Some(destination) => destinations.push(destination),
            None => info!(destination = %config.name(), "No webhook configured, skipping"),
        }
    }
    Ok(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use contracts::{DeliveryPolicy, DestinationKind};
    use tempfile::TempDir;

    fn postings(n: usize) -> Vec<Posting> {
        (0..n)
            .map(|i| Posting {
                id: format!("p{i}"),
                title: format!("Job {i}"),
                team: None,
                location: "Remote".into(),
                commitment: None,
                description: String::new(),
                apply_url: format!("https://jobs.lever.co/acme/p{i}"),
                created_at: 0,
            })
            .collect()
    }

    fn dispatcher(dir: &TempDir) -> Dispatcher {
        Dispatcher::new(DeliveryHistory::new(dir.path()))
    }

    fn tracked(limit: usize) -> DeliveryPolicy {
        DeliveryPolicy {
            batch_limit: Some(limit),
            uses_history: true,
        }
    }

    #[tokio::test]
    async fn test_history_makes_delivery_idempotent() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir);
        let mut sink = MemorySink::new("discord", tracked(10));
        let input = postings(3);

        let first = dispatcher.dispatch(&mut sink, &input, "acme").await.unwrap();
        assert_eq!(first.postings_sent, 3);
        assert_eq!(first.messages_sent, 1);

        let second = dispatcher.dispatch(&mut sink, &input, "acme").await.unwrap();
        assert_eq!(second.messages_sent, 0);
        assert_eq!(second.already_delivered, 3);
        assert_eq!(sink.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_batches_carry_ranges() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir);
        let mut sink = MemorySink::new("discord", tracked(10));

        let report = dispatcher
            .dispatch(&mut sink, &postings(23), "acme")
            .await
            .unwrap();

        assert_eq!(report.messages_sent, 3);
        assert_eq!(
            sink.headlines(),
            vec![
                "23 new job(s) at acme! (1-10)",
                "23 new job(s) at acme! (11-20)",
                "23 new job(s) at acme! (21-23)",
            ]
        );
        assert_eq!(dispatcher.metrics().snapshot().message_count, 3);
        assert_eq!(dispatcher.history().delivered_ids("discord").len(), 23);
    }

    #[tokio::test]
    async fn test_failed_batch_is_not_recorded() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir);
        let mut sink = MemorySink::new("discord", tracked(10)).fail_on_attempt(1);

        let err = dispatcher
            .dispatch(&mut sink, &postings(23), "acme")
            .await
            .unwrap_err();

        match &err {
            DispatcherError::Delivery {
                range,
                sent_before_failure,
                ..
            } => {
                assert_eq!(range.unwrap().to_string(), "11-20");
                assert_eq!(*sent_before_failure, 10);
            }
            other => panic!("unexpected error: {other}"),
        }

        let delivered = dispatcher.history().delivered_ids("discord");
        assert_eq!(delivered.len(), 10);
        assert!(delivered.contains("p9"));
        assert!(!delivered.contains("p10"));
        assert_eq!(dispatcher.metrics().snapshot().failure_count, 1);

        // Next run resends only the unrecorded postings
        let mut retry = MemorySink::new("discord", tracked(10));
        let report = dispatcher
            .dispatch(&mut retry, &postings(23), "acme")
            .await
            .unwrap();
        assert_eq!(report.already_delivered, 10);
        assert_eq!(report.postings_sent, 13);
        assert_eq!(retry.sent_ids().first().map(String::as_str), Some("p10"));
    }

    #[tokio::test]
    async fn test_destination_without_history_always_sends() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir);
        let mut sink = MemorySink::new("slack", DestinationKind::Slack.default_policy());
        let input = postings(2);

        dispatcher.dispatch(&mut sink, &input, "acme").await.unwrap();
        dispatcher.dispatch(&mut sink, &input, "acme").await.unwrap();

        assert_eq!(sink.sent().len(), 2);
        assert!(!dispatcher.history().history_path("slack").exists());
    }

    #[tokio::test]
    async fn test_empty_input_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir);
        let mut sink = MemorySink::new("discord", tracked(10));

        let report = dispatcher.dispatch(&mut sink, &[], "acme").await.unwrap();
        assert_eq!(report.messages_sent, 0);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_failure_isolated_per_destination() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir);
        let mut sinks = vec![
            MemorySink::new("broken", tracked(10)).fail_on_attempt(0),
            MemorySink::new("healthy", tracked(10)),
        ];

        let outcomes = dispatcher
            .dispatch_all(&mut sinks, &postings(4), "acme")
            .await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_err());
        assert_eq!(outcomes[1].result.as_ref().unwrap().postings_sent, 4);
        assert!(dispatcher.history().delivered_ids("broken").is_empty());
        assert_eq!(sinks[1].sent().len(), 1);
    }

    #[test]
    fn test_create_destinations_skips_missing_webhook() {
        let mut slack = DestinationConfig::new(DestinationKind::Slack);
        slack.webhook_url = Some("https://hooks.slack.com/services/T/B/X".into());
        let configs = vec![slack, DestinationConfig::new(DestinationKind::Discord)];

        let destinations = create_destinations(&configs, Duration::from_secs(5)).unwrap();
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].name(), "slack");
    }
}
