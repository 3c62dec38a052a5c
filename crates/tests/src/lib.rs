//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Config file to live destinations
//! - Multi-run watch scenarios over mock sources (no network)
//! - Failure isolation across the detector and dispatcher

#[cfg(test)]
mod config_tests {
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{DestinationKind, Notifier};
    use dispatcher::create_destinations;

    const CONFIG: &str = r#"
organization = "acme"
pattern = "engineer"
storage_dir = "/tmp/lever-watcher-test"

[[destinations]]
kind = "discord"
webhook_url = "https://discord.com/api/webhooks/1/token"

[[destinations]]
kind = "slack"

[[destinations]]
kind = "log"
name = "console"
batch_limit = 5
"#;

    #[test]
    fn test_config_to_destinations() {
        let config = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        assert_eq!(config.destinations.len(), 3);

        let destinations = create_destinations(
            &config.destinations,
            Duration::from_secs(config.request_timeout_secs),
        )
        .unwrap();

        // slack has no webhook and is skipped
        let names: Vec<&str> = destinations.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["discord", "console"]);
        assert_eq!(destinations[0].kind(), DestinationKind::Discord);
        assert!(destinations[0].policy().uses_history);
        assert_eq!(destinations[1].policy().batch_limit, Some(5));
    }

    #[test]
    fn test_json_and_toml_agree() {
        let toml = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&toml).unwrap();
        let reparsed = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(reparsed.organization, "acme");
        assert_eq!(reparsed.destinations[2].name(), "console");
    }
}

#[cfg(test)]
mod e2e_tests {
    use contracts::{DeliveryPolicy, DestinationKind, PostingSource};
    use dispatcher::{Dispatcher, DispatcherError, MemorySink};
    use ingestion::{MockPostingSource, PostingFilter};
    use state_store::{ChangeDetector, DeliveryHistory};
    use tempfile::TempDir;

    /// Detector + dispatcher wired the way the watch command wires them
    struct Harness {
        _dir: TempDir,
        source: MockPostingSource,
        filter: PostingFilter,
        detector: ChangeDetector,
        dispatcher: Dispatcher,
    }

    impl Harness {
        fn new(pattern: Option<&str>) -> Self {
            let dir = TempDir::new().unwrap();
            Self {
                source: MockPostingSource::new("acme", Vec::new()),
                filter: PostingFilter::from_pattern(pattern).unwrap(),
                detector: ChangeDetector::new(dir.path()).unwrap(),
                dispatcher: Dispatcher::new(DeliveryHistory::new(dir.path())),
                _dir: dir,
            }
        }

        /// One watch cycle; returns new IDs and per-destination errors
        async fn cycle(&self, sinks: &mut [MemorySink]) -> (Vec<String>, Vec<DispatcherError>) {
            let postings = self.filter.apply(self.source.fetch().await.unwrap());
            let new = self.detector.detect_new("acme", &postings).unwrap();
            let ids = new.iter().map(|p| p.id.clone()).collect();
            if new.is_empty() {
                return (ids, Vec::new());
            }
            let errors = self
                .dispatcher
                .dispatch_all(sinks, &new, "acme")
                .await
                .into_iter()
                .filter_map(|o| o.result.err())
                .collect();
            (ids, errors)
        }
    }

    fn job(id: &str, title: &str) -> contracts::Posting {
        MockPostingSource::posting(id, title)
    }

    /// End-to-end: MockPostingSource -> PostingFilter -> ChangeDetector -> Dispatcher
    #[tokio::test]
    async fn test_watch_cycles() {
        let harness = Harness::new(None);
        let mut sinks = vec![
            MemorySink::new("discord", DestinationKind::Discord.default_policy()),
            MemorySink::new("slack", DestinationKind::Slack.default_policy()),
        ];

        // Run 1: baseline, nothing sent
        harness.source.set_postings(vec![job("a", "A"), job("b", "B")]);
        let (new, errors) = harness.cycle(&mut sinks).await;
        assert!(new.is_empty() && errors.is_empty());

        // Run 2: unchanged
        let (new, _) = harness.cycle(&mut sinks).await;
        assert!(new.is_empty());

        // Run 3: b disappears, c appears
        harness.source.set_postings(vec![job("a", "A"), job("c", "C")]);
        let (new, errors) = harness.cycle(&mut sinks).await;
        assert_eq!(new, vec!["c"]);
        assert!(errors.is_empty());
        assert_eq!(sinks[0].sent_ids(), vec!["c"]);
        assert_eq!(sinks[1].sent_ids(), vec!["c"]);

        // Run 4: b comes back and counts as new again
        harness
            .source
            .set_postings(vec![job("a", "A"), job("b", "B"), job("c", "C")]);
        let (new, _) = harness.cycle(&mut sinks).await;
        assert_eq!(new, vec!["b"]);

        let snapshot = harness.detector.load_snapshot("acme").unwrap().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            harness.dispatcher.history().delivered_ids("discord").len(),
            2
        );
    }

    #[tokio::test]
    async fn test_filtered_postings_never_reach_snapshot() {
        let harness = Harness::new(Some("rust"));
        let mut sinks = vec![MemorySink::new(
            "log",
            DeliveryPolicy {
                batch_limit: None,
                uses_history: false,
            },
        )];

        harness.source.set_postings(vec![job("a", "Rust Dev")]);
        harness.cycle(&mut sinks).await;

        harness
            .source
            .set_postings(vec![job("a", "Rust Dev"), job("b", "Sales"), job("c", "rust sre")]);
        let (new, _) = harness.cycle(&mut sinks).await;
        assert_eq!(new, vec!["c"]);

        let snapshot = harness.detector.load_snapshot("acme").unwrap().unwrap();
        assert!(!snapshot.contains("b"));
    }

    #[tokio::test]
    async fn test_large_batch_split_and_partial_failure() {
        let harness = Harness::new(None);
        let mut sinks = vec![
            MemorySink::new("discord", DestinationKind::Discord.default_policy()).fail_on_attempt(2),
            MemorySink::new("slack", DestinationKind::Slack.default_policy()),
        ];

        harness.source.set_postings(Vec::new());
        harness.cycle(&mut sinks).await;

        let postings: Vec<_> = (0..23).map(|i| job(&format!("p{i}"), "Job")).collect();
        harness.source.set_postings(postings);
        let (new, errors) = harness.cycle(&mut sinks).await;

        assert_eq!(new.len(), 23);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].destination(), "discord");

        // Discord got batches 1-10 and 11-20 before 21-23 failed
        assert_eq!(
            sinks[0].headlines(),
            vec!["23 new job(s) at acme! (1-10)", "23 new job(s) at acme! (11-20)"]
        );
        assert_eq!(
            harness.dispatcher.history().delivered_ids("discord").len(),
            20
        );

        // Slack fits 23 postings into one message
        assert_eq!(sinks[1].headlines(), vec!["23 new job(s) at acme!"]);
    }

    #[test]
    fn test_corrupt_snapshot_is_fatal_and_preserved() {
        let dir = TempDir::new().unwrap();
        let detector = ChangeDetector::new(dir.path()).unwrap();
        let path = detector.snapshot_path("acme").unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let result = detector.detect_new("acme", &[job("a", "A")]);

        assert!(matches!(
            result,
            Err(contracts::ContractError::CorruptSnapshot { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_history_suppresses_redelivery() {
        let harness = Harness::new(None);
        let mut sinks = vec![MemorySink::new(
            "discord",
            DestinationKind::Discord.default_policy(),
        )];

        harness.source.set_postings(Vec::new());
        harness.cycle(&mut sinks).await;
        harness.source.set_postings(vec![job("a", "A")]);
        harness.cycle(&mut sinks).await;
        assert_eq!(sinks[0].sent().len(), 1);

        // Same posting handed to the dispatcher again: history suppresses it
        let report = harness
            .dispatcher
            .dispatch(&mut sinks[0], &[job("a", "A")], "acme")
            .await
            .unwrap();
        assert_eq!(report.already_delivered, 1);
        assert_eq!(sinks[0].sent().len(), 1);
    }
}
