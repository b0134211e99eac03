use std::future::Future;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::{TokioAsyncResolver, system_conf};
use tracing::warn;

/// Result of a single CNAME query for one subdomain.
///
/// The three failure shapes are kept distinct because the reported status
/// differs for each: the name does not exist at all, the name exists but has
/// no CNAME record, and everything else (timeout, SERVFAIL, malformed
/// response) with the library's message text kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CnameOutcome {
    Found(String),
    NoRecord,
    NameNotFound,
    Failed(String),
}

/// Seam between the worker pool and the DNS client.
pub trait Resolve: Send + Sync {
    fn resolve(&self, subdomain: &str) -> impl Future<Output = CnameOutcome> + Send;
}

pub struct CnameResolver {
    inner: TokioAsyncResolver,
}

impl CnameResolver {
    /// Build a resolver from the system configuration. A missing or broken
    /// system config degrades to the library defaults with a warning rather
    /// than aborting the run.
    pub fn from_system_conf() -> Self {
        let (config, mut opts) = match system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(err) => {
                warn!("failed to read system resolver config: {err}; using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        // one query per subdomain, a failed lookup is final
        opts.attempts = 1;

        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Issue exactly one CNAME-type query. CNAME chains are not followed, and
    /// only the first CNAME record of a multi-record answer is considered.
    pub async fn lookup_cname(&self, subdomain: &str) -> CnameOutcome {
        match self.inner.lookup(subdomain, RecordType::CNAME).await {
            Ok(answer) => {
                let target = answer
                    .record_iter()
                    .find_map(|record| record.data().and_then(|data| data.as_cname()))
                    .map(|cname| cname.to_string());

                match target {
                    Some(target) => CnameOutcome::Found(strip_root_label(&target).to_string()),
                    None => CnameOutcome::NoRecord,
                }
            }
            // hickory surfaces an empty answer section as NoRecordsFound; the
            // response code tells NXDOMAIN apart from a live name with no CNAME
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    if *response_code == ResponseCode::NXDomain {
                        CnameOutcome::NameNotFound
                    } else {
                        CnameOutcome::NoRecord
                    }
                }
                _ => CnameOutcome::Failed(err.to_string()),
            },
        }
    }
}

impl Resolve for CnameResolver {
    fn resolve(&self, subdomain: &str) -> impl Future<Output = CnameOutcome> + Send {
        self.lookup_cname(subdomain)
    }
}

fn strip_root_label(target: &str) -> &str {
    target.trim_end_matches('.')
}
