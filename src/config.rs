//! Pipeline configuration: which URL each source is fetched from, how its
//! links are resolved, and the fetch limits shared by every source.
//!
//! A [`PipelineConfig`] is built once at startup (built-in defaults, then an
//! optional YAML override file, then CLI flags) and is read-only afterwards.
//!
//! # Override file
//!
//! ```yaml
//! timeout_secs: 5
//! max_retries: 2
//! sources:
//!   austlii:
//!     url: http://mirror.example/cgi-bin/viewdb/au/cases/cth/FCA/
//!     base: http://mirror.example
//! ```

use crate::error::ConfigError;
use crate::models::Source;
use crate::normalize::LinkRule;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const LAWYERS_WEEKLY_URL: &str = "https://www.lawyersweekly.com.au/rss";
pub const LAWYERS_WEEKLY_BASE: &str = "https://www.lawyersweekly.com.au";
pub const AUSTLII_URL: &str = "http://www.austlii.edu.au/cgi-bin/viewdb/au/cases/cth/FCA/";
pub const AUSTLII_BASE: &str = "http://www.austlii.edu.au";
pub const FEDERAL_COURT_URL: &str = "http://www.fedcourt.gov.au/digital-law-library/judgments";
pub const FEDERAL_COURT_BASE: &str = "http://www.fedcourt.gov.au";
pub const LAW_SOCIETY_URL: &str = "https://www.lawsociety.com.au/news-amp-events/news";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_MAX_RETRIES: usize = 1;
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
pub const DEFAULT_USER_AGENT: &str = concat!("legalcurrent_feed/", env!("CARGO_PKG_VERSION"));

/// Where one source lives and how its relative links are made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub source: Source,
    pub url: Url,
    /// Base authority for relative links. `None` keeps links verbatim.
    pub link_base: Option<Url>,
}

impl SourceSpec {
    /// Built-in location of `source`.
    pub fn default_for(source: Source) -> Result<Self, ConfigError> {
        let (url, base) = match source {
            Source::LawyersWeekly => (LAWYERS_WEEKLY_URL, Some(LAWYERS_WEEKLY_BASE)),
            Source::AustLii => (AUSTLII_URL, Some(AUSTLII_BASE)),
            Source::FederalCourt => (FEDERAL_COURT_URL, Some(FEDERAL_COURT_BASE)),
            Source::LawSocietyNsw => (LAW_SOCIETY_URL, None),
        };
        Ok(Self {
            source,
            url: parse_url(url)?,
            link_base: base.map(parse_url).transpose()?,
        })
    }

    pub fn link_rule(&self) -> LinkRule {
        match &self.link_base {
            Some(base) => LinkRule::Resolve(base.clone()),
            None => LinkRule::Verbatim,
        }
    }
}

/// Immutable settings shared by every aggregate call.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// One entry per source, always in [`Source::ALL`] order.
    pub sources: Vec<SourceSpec>,
    /// Upper bound on one source's fetch, retries and parse included.
    pub timeout: Duration,
    pub max_retries: usize,
    pub retry_base_delay: Duration,
    pub user_agent: String,
}

impl PipelineConfig {
    pub fn defaults() -> Result<Self, ConfigError> {
        let sources = Source::ALL
            .into_iter()
            .map(SourceSpec::default_for)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sources,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Defaults, overridden by the YAML file at `path` when given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::defaults();
        };
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(path, "Loaded config overrides");
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(yaml)?;
        let mut config = Self::defaults()?;
        config.apply(file)?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(test)]
    pub fn spec(&self, source: Source) -> Option<&SourceSpec> {
        self.sources.iter().find(|spec| spec.source == source)
    }

    fn apply(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = file.max_retries {
            self.max_retries = retries;
        }
        if let Some(ms) = file.retry_base_delay_ms {
            self.retry_base_delay = Duration::from_millis(ms);
        }
        if let Some(ua) = file.user_agent {
            self.user_agent = ua;
        }

        for spec in &mut self.sources {
            let over = match spec.source {
                Source::LawyersWeekly => &file.sources.lawyers_weekly,
                Source::AustLii => &file.sources.austlii,
                Source::FederalCourt => &file.sources.federal_court,
                Source::LawSocietyNsw => &file.sources.law_society_nsw,
            };
            let Some(over) = over else { continue };
            if let Some(url) = &over.url {
                spec.url = parse_url(url)?;
            }
            if let Some(base) = &over.base {
                spec.link_base = Some(parse_url(base)?);
            }
        }
        Ok(())
    }
}

/// Shape of the optional YAML override file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    timeout_secs: Option<u64>,
    max_retries: Option<usize>,
    retry_base_delay_ms: Option<u64>,
    user_agent: Option<String>,
    sources: SourceOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SourceOverrides {
    lawyers_weekly: Option<SourceOverride>,
    austlii: Option<SourceOverride>,
    federal_court: Option<SourceOverride>,
    law_society_nsw: Option<SourceOverride>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SourceOverride {
    url: Option<String>,
    base: Option<String>,
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::Url {
        url: url.to_string(),
        source,
    })
}
