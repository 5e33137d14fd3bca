use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use storage::Table;
use storage::database::max_rows_per_statement;

use crate::{ImporterError, Result};

pub const DEFAULT_SEARCH_URL: &str = "https://www.beathletics.be";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_RESULTS_LIMIT: i64 = 3000;
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Where the federation API lives and how to authenticate against it.
#[derive(Clone)]
pub struct RemoteConfig {
    /// OAuth token endpoint. Only checked when a token is actually needed.
    pub auth_url: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub search_url: String,
}

impl RemoteConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            auth_url: None,
            client_id: String::new(),
            client_secret: String::new(),
            api_url: api_url.into(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }

    pub fn with_auth(
        mut self,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.auth_url = Some(auth_url.into());
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self
    }

    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    pub fn api_endpoint(&self, path: &str) -> String {
        join_url(&self.api_url, path)
    }

    pub fn search_endpoint(&self, path: &str) -> String {
        join_url(&self.search_url, path)
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("search_url", &self.search_url)
            .finish()
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Tuning knobs shared by every stage.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub chunk_size: usize,
    /// How many stored athletes the results stage considers.
    pub results_limit: i64,
    /// Athletes whose results are fetched and written at the same time.
    pub concurrency: usize,
    pub prefixes: PrefixRange,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            results_limit: DEFAULT_RESULTS_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            prefixes: PrefixRange::default(),
        }
    }
}

impl ImportOptions {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ImporterError::ConfigurationError(
                "chunk size must be at least 1".to_string(),
            ));
        }

        let ceiling = Table::ALL
            .iter()
            .map(|table| max_rows_per_statement(*table))
            .min()
            .unwrap_or(DEFAULT_CHUNK_SIZE);
        if self.chunk_size > ceiling {
            return Err(ImporterError::ConfigurationError(format!(
                "chunk size {} exceeds the {} rows a single insert can bind",
                self.chunk_size, ceiling
            )));
        }

        if self.concurrency == 0 {
            return Err(ImporterError::ConfigurationError(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if self.results_limit < 0 {
            return Err(ImporterError::ConfigurationError(
                "results limit cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Inclusive range of single-letter search prefixes, written `a-c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixRange {
    start: char,
    end: char,
}

impl PrefixRange {
    pub fn new(start: char, end: char) -> Result<Self> {
        let start = start.to_ascii_lowercase();
        let end = end.to_ascii_lowercase();

        if !start.is_ascii_lowercase() || !end.is_ascii_lowercase() {
            return Err(ImporterError::ConfigurationError(format!(
                "prefix range {}-{} must use letters a-z",
                start, end
            )));
        }
        if start > end {
            return Err(ImporterError::ConfigurationError(format!(
                "prefix range {}-{} is reversed",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    pub fn iter(&self) -> RangeInclusive<char> {
        self.start..=self.end
    }

    pub fn count(&self) -> usize {
        (self.end as usize) - (self.start as usize) + 1
    }
}

impl Default for PrefixRange {
    fn default() -> Self {
        Self {
            start: 'a',
            end: 'c',
        }
    }
}

impl FromStr for PrefixRange {
    type Err = ImporterError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            ImporterError::ConfigurationError(format!(
                "invalid prefix range '{}', expected a letter or a range like a-c",
                s
            ))
        };

        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(single), None, None, None) => Self::new(single, single),
            (Some(start), Some('-'), Some(end), None) => Self::new(start, end),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for PrefixRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix_range_is_a_to_c() {
        let range = PrefixRange::default();
        assert_eq!(range.iter().collect::<String>(), "abc");
        assert_eq!(range.count(), 3);
        assert_eq!(range.to_string(), "a-c");
    }

    #[test]
    fn test_prefix_range_parsing() {
        assert_eq!("a-z".parse::<PrefixRange>().unwrap().count(), 26);
        assert_eq!("D-F".parse::<PrefixRange>().unwrap().to_string(), "d-f");
        assert_eq!("m".parse::<PrefixRange>().unwrap().iter().collect::<String>(), "m");

        assert!("c-a".parse::<PrefixRange>().is_err());
        assert!("1-3".parse::<PrefixRange>().is_err());
        assert!("ab".parse::<PrefixRange>().is_err());
        assert!("".parse::<PrefixRange>().is_err());
    }

    #[test]
    fn test_endpoint_joining() {
        let config = RemoteConfig::new("https://api.example.org/").with_search_url("https://search.example.org");

        assert_eq!(
            config.api_endpoint("/api/athlete/all"),
            "https://api.example.org/api/athlete/all"
        );
        assert_eq!(
            config.search_endpoint("api/search/public/a"),
            "https://search.example.org/api/search/public/a"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = RemoteConfig::new("https://api.example.org").with_auth(
            "https://auth.example.org/token",
            "importer",
            "s3cret",
        );
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("importer"));
    }

    #[test]
    fn test_options_validation() {
        assert!(ImportOptions::default().validate().is_ok());

        let zero_chunk = ImportOptions {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_chunk.validate(),
            Err(ImporterError::ConfigurationError(_))
        ));

        let oversized = ImportOptions {
            chunk_size: 100_000,
            ..Default::default()
        };
        assert!(oversized.validate().is_err());

        let no_workers = ImportOptions {
            concurrency: 0,
            ..Default::default()
        };
        assert!(no_workers.validate().is_err());
    }
}
