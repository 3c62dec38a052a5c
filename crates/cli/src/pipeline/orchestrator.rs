//! Watch pipeline orchestrator - fetch, filter, detect, dispatch.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{Notifier, PostingSource, WatchConfig};
use dispatcher::{create_destinations, Dispatcher};
use ingestion::{LeverClient, PostingFilter};
use state_store::{ChangeDetector, DeliveryHistory};
use tracing::{info, instrument};

use super::RunStats;

/// One watch run over a validated configuration
pub struct WatchPipeline {
    config: WatchConfig,
}

impl WatchPipeline {
    /// Create a pipeline; `config.storage_dir` must already be expanded
    pub fn new(config: WatchConfig) -> Self {
        Self { config }
    }

    /// Run against the Lever API and the configured destinations
    pub async fn run(&self) -> Result<RunStats> {
        let source = LeverClient::from_config(&self.config)
            .context("Failed to create postings client")?;
        let mut destinations = create_destinations(
            &self.config.destinations,
            Duration::from_secs(self.config.request_timeout_secs),
        )
        .context("Failed to create destinations")?;

        info!(
            organization = %self.config.organization,
            destinations = destinations.len(),
            storage = %self.config.storage_dir.display(),
            "Configuration loaded"
        );

        self.run_with(&source, &mut destinations).await
    }

    /// Run with an explicit source and destinations
    ///
    /// Fetch, filter and snapshot errors abort the run. Destination failures
    /// are collected in the returned stats.
    #[instrument(
        name = "watch_pipeline_run",
        skip(self, source, destinations),
        fields(organization = %self.config.organization)
    )]
    pub async fn run_with<S, N>(&self, source: &S, destinations: &mut [N]) -> Result<RunStats>
    where
        S: PostingSource,
        N: Notifier,
    {
        let start_time = Instant::now();
        let organization = self.config.organization.as_str();

        let filter = PostingFilter::from_pattern(self.config.pattern.as_deref())
            .context("Invalid filter pattern")?;
        let detector = ChangeDetector::new(&self.config.storage_dir)
            .context("Failed to prepare storage directory")?;

        let fetched = source
            .fetch()
            .await
            .with_context(|| format!("Failed to fetch postings for '{organization}'"))?;
        let fetched_count = fetched.len();
        let postings = filter.apply(fetched);

        let detection = detector
            .detect(organization, &postings)
            .context("Change detection failed")?;
        let new_postings = detection.new_postings;

        let mut stats = RunStats {
            fetched: fetched_count,
            matched: postings.len(),
            new_postings: new_postings.len(),
            baseline: detection.baseline,
            ..Default::default()
        };

        if !new_postings.is_empty() {
            let dispatcher = Dispatcher::new(DeliveryHistory::new(&self.config.storage_dir));
            stats.outcomes = dispatcher
                .dispatch_all(destinations, &new_postings, organization)
                .await;
            stats.delivery = dispatcher.metrics().snapshot();
        }

        stats.duration = start_time.elapsed();
        info!(
            fetched = stats.fetched,
            matched = stats.matched,
            new = stats.new_postings,
            duration_ms = stats.duration.as_millis() as u64,
            "Watch run complete"
        );
        Ok(stats)
    }
}
