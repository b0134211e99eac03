use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task;
use tracing::debug;

use crate::classifier::{CheckOutcome, Classifier};
use crate::resolver::Resolve;

/// Bounded fan-out over the input list: one resolve-then-classify task per
/// subdomain, at most `concurrency` in flight at once.
pub struct TakeoverScanner<R> {
    resolver: Arc<R>,
    classifier: Arc<Classifier>,
    concurrency: usize,
}

impl<R: Resolve + 'static> TakeoverScanner<R> {
    pub fn new(resolver: R, classifier: Classifier, concurrency: usize) -> Self {
        Self {
            resolver: Arc::new(resolver),
            classifier: Arc::new(classifier),
            concurrency,
        }
    }

    /// Check every subdomain and return one outcome per input, returning only
    /// once all tasks have finished. A task that dies unexpectedly is caught
    /// at the join point and reported as a failed lookup for its subdomain;
    /// it never aborts the rest of the pool.
    pub async fn run(&self, subdomains: Vec<String>) -> Vec<CheckOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(subdomains.len());

        for subdomain in subdomains {
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            let resolver = Arc::clone(&self.resolver);
            let classifier = Arc::clone(&self.classifier);
            let name = subdomain.clone();

            let handle = task::spawn(async move {
                let _permit = permit;
                let outcome = resolver.resolve(&subdomain).await;
                classifier.classify(&subdomain, outcome)
            });

            handles.push((name, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (subdomain, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    debug!("check task for {subdomain} died: {err}");
                    CheckOutcome::LookupFailed {
                        subdomain,
                        error: format!("check task failed: {err}"),
                    }
                }
            };
            results.push(outcome);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::fingerprints::FingerprintTable;
    use crate::resolver::CnameOutcome;

    /// Resolver with canned answers and an in-flight counter.
    struct ScriptedResolver {
        outcomes: HashMap<String, CnameOutcome>,
        delay: Duration,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ScriptedResolver {
        fn new<I>(outcomes: I) -> Self
        where
            I: IntoIterator<Item = (&'static str, CnameOutcome)>,
        {
            Self {
                outcomes: outcomes
                    .into_iter()
                    .map(|(name, outcome)| (name.to_string(), outcome))
                    .collect(),
                delay: Duration::ZERO,
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    impl Resolve for ScriptedResolver {
        fn resolve(&self, subdomain: &str) -> impl Future<Output = CnameOutcome> + Send {
            let outcome = self
                .outcomes
                .get(subdomain)
                .cloned()
                .unwrap_or(CnameOutcome::NameNotFound);
            async move {
                let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(self.delay).await;
                self.active.fetch_sub(1, Ordering::SeqCst);
                outcome
            }
        }
    }

    struct PanickingResolver;

    impl Resolve for PanickingResolver {
        fn resolve(&self, _subdomain: &str) -> impl Future<Output = CnameOutcome> + Send {
            async { panic!("resolver blew up") }
        }
    }

    fn scanner<R: Resolve + 'static>(resolver: R, concurrency: usize) -> TakeoverScanner<R> {
        TakeoverScanner::new(
            resolver,
            Classifier::new(FingerprintTable::builtin()),
            concurrency,
        )
    }

    fn sample_outcomes() -> Vec<(&'static str, CnameOutcome)> {
        vec![
            (
                "s3-bucket.example.com",
                CnameOutcome::Found("mybucket.s3.amazonaws.com".to_string()),
            ),
            (
                "safe.example.com",
                CnameOutcome::Found("internal.example.net".to_string()),
            ),
            ("ghost.example.com", CnameOutcome::NameNotFound),
            ("apex.example.com", CnameOutcome::NoRecord),
            (
                "flaky.example.com",
                CnameOutcome::Failed("connection timed out".to_string()),
            ),
        ]
    }

    #[tokio::test]
    async fn test_one_outcome_per_subdomain() {
        let inputs: Vec<String> = sample_outcomes()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        let scanner = scanner(ScriptedResolver::new(sample_outcomes()), 3);

        let results = scanner.run(inputs.clone()).await;

        assert_eq!(results.len(), inputs.len());
        let mut seen: Vec<&str> = results.iter().map(|r| r.subdomain()).collect();
        seen.sort_unstable();
        let mut expected: Vec<&str> = inputs.iter().map(String::as_str).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);

        assert!(results.iter().any(|r| matches!(
            r,
            CheckOutcome::Matched { provider, .. } if provider == "AWS S3"
        )));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrency_bound_holds() {
        let resolver =
            ScriptedResolver::new(sample_outcomes()).with_delay(Duration::from_millis(20));
        let scanner = scanner(resolver, 2);

        let inputs: Vec<String> = (0..12).map(|i| format!("sub{i}.example.com")).collect();
        let results = scanner.run(inputs).await;

        assert_eq!(results.len(), 12);
        assert!(scanner.resolver.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_concurrency_of_one() {
        let scanner = scanner(ScriptedResolver::new(sample_outcomes()), 1);
        let results = scanner
            .run(vec![
                "s3-bucket.example.com".to_string(),
                "ghost.example.com".to_string(),
            ])
            .await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_idempotent_up_to_ordering() {
        let inputs: Vec<String> = sample_outcomes()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        let scanner = scanner(ScriptedResolver::new(sample_outcomes()), 4);

        let mut first = scanner.run(inputs.clone()).await;
        let mut second = scanner.run(inputs).await;
        first.sort_by(|a, b| a.subdomain().cmp(b.subdomain()));
        second.sort_by(|a, b| a.subdomain().cmp(b.subdomain()));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let scanner = scanner(ScriptedResolver::new([]), 20);
        let results = scanner.run(Vec::new()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_task_panic_becomes_lookup_failed() {
        let scanner = scanner(PanickingResolver, 4);
        let results = scanner.run(vec!["doomed.example.com".to_string()]).await;

        assert_eq!(results.len(), 1);
        match &results[0] {
            CheckOutcome::LookupFailed { subdomain, error } => {
                assert_eq!(subdomain, "doomed.example.com");
                assert!(error.starts_with("check task failed"));
            }
            other => panic!("expected LookupFailed, got {other:?}"),
        }
    }
}
