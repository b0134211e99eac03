//! Known-vulnerable hosting provider fingerprints.
//!
//! A dangling CNAME pointing at one of these services can often be re-claimed
//! by registering the deprovisioned resource under the same name.

/// Default fingerprint set. Matching is substring containment against the
/// resolved CNAME target; entries are checked in order and the first hit wins.
const BUILTIN_FINGERPRINTS: &[(&str, &str)] = &[
    ("elasticbeanstalk.com", "AWS Elastic Beanstalk"),
    ("s3.amazonaws.com", "AWS S3"),
    ("agilecrm.com", "Agile CRM"),
    ("airee.ru", "Airee.ru"),
    ("animaapp.io", "Anima"),
    ("bitbucket.io", "Bitbucket"),
    ("trydiscourse.com", "Discourse"),
    ("hatenablog.com", "Hatena Blog"),
    ("helpjuice.com", "Help Juice"),
    ("helpscoutdocs.com", "Help Scout"),
    ("helprace.com", "Helprace"),
    ("azurewebsites.net", "Azure App Service"),
    ("cloudapp.net", "Azure CloudApp"),
    ("azureedge.net", "Azure CDN"),
    ("azurecr.io", "Azure Container Registry"),
    ("ngrok.io", "Ngrok"),
    ("launchrock.com", "LaunchRock"),
    ("readme.io", "ReadMe.io"),
    ("readthedocs.io", "Read the Docs"),
    ("surge.sh", "Surge.sh"),
    ("s.strikinglydns.com", "Strikingly"),
    ("wordpress.com", "WordPress"),
    ("worksites.net", "Worksites"),
    ("uberflip.com", "Uberflip"),
    ("smartjobboard.com", "SmartJobBoard"),
];

#[derive(Debug, Clone)]
struct Fingerprint {
    pattern: String,
    provider: String,
}

/// Ordered fingerprint table, immutable once built.
#[derive(Debug, Clone)]
pub struct FingerprintTable {
    entries: Vec<Fingerprint>,
}

impl FingerprintTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(pattern, provider)| Fingerprint {
                    pattern: pattern.into(),
                    provider: provider.into(),
                })
                .collect(),
        }
    }

    /// Table of services with publicly known takeover write-ups.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_FINGERPRINTS.iter().copied())
    }

    /// Provider of the first entry whose pattern occurs within `cname`.
    pub fn lookup(&self, cname: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| cname.contains(&entry.pattern))
            .map(|entry| entry.provider.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
