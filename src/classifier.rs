use crate::fingerprints::FingerprintTable;
use crate::resolver::CnameOutcome;

/// Final status for one checked subdomain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// CNAME target matched a known-vulnerable service fingerprint.
    Matched {
        subdomain: String,
        cname: String,
        provider: String,
    },
    /// CNAME resolved but matched no fingerprint.
    Safe { subdomain: String, cname: String },
    /// Name exists but carries no CNAME record.
    NoRecord { subdomain: String },
    /// NXDOMAIN.
    NotFound { subdomain: String },
    /// Timeout, SERVFAIL, or any other resolution failure.
    LookupFailed { subdomain: String, error: String },
}

impl CheckOutcome {
    pub fn subdomain(&self) -> &str {
        match self {
            CheckOutcome::Matched { subdomain, .. }
            | CheckOutcome::Safe { subdomain, .. }
            | CheckOutcome::NoRecord { subdomain }
            | CheckOutcome::NotFound { subdomain }
            | CheckOutcome::LookupFailed { subdomain, .. } => subdomain,
        }
    }

    pub fn cname(&self) -> Option<&str> {
        match self {
            CheckOutcome::Matched { cname, .. } | CheckOutcome::Safe { cname, .. } => Some(cname),
            _ => None,
        }
    }

    pub fn provider(&self) -> Option<&str> {
        match self {
            CheckOutcome::Matched { provider, .. } => Some(provider),
            _ => None,
        }
    }

    pub fn status_label(&self) -> String {
        match self {
            CheckOutcome::Matched { .. } => "POSSIBLE TAKEOVER".to_string(),
            CheckOutcome::Safe { .. } => "Safe".to_string(),
            CheckOutcome::NoRecord { .. } => "No CNAME".to_string(),
            CheckOutcome::NotFound { .. } => "NXDOMAIN".to_string(),
            CheckOutcome::LookupFailed { error, .. } => format!("Error: {error}"),
        }
    }
}

/// Maps resolver outcomes to check outcomes against an injected fingerprint
/// table. Read-only, shared across workers without synchronization.
pub struct Classifier {
    table: FingerprintTable,
}

impl Classifier {
    pub fn new(table: FingerprintTable) -> Self {
        Self { table }
    }

    pub fn classify(&self, subdomain: &str, outcome: CnameOutcome) -> CheckOutcome {
        match outcome {
            CnameOutcome::Found(cname) => match self.table.lookup(&cname) {
                Some(provider) => CheckOutcome::Matched {
                    subdomain: subdomain.to_string(),
                    cname,
                    provider: provider.to_string(),
                },
                None => CheckOutcome::Safe {
                    subdomain: subdomain.to_string(),
                    cname,
                },
            },
            CnameOutcome::NoRecord => CheckOutcome::NoRecord {
                subdomain: subdomain.to_string(),
            },
            CnameOutcome::NameNotFound => CheckOutcome::NotFound {
                subdomain: subdomain.to_string(),
            },
            CnameOutcome::Failed(error) => CheckOutcome::LookupFailed {
                subdomain: subdomain.to_string(),
                error,
            },
        }
    }
}
