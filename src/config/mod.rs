//! Configuration management.
//!
//! Settings can come from a TOML file with environment variable overrides
//! (prefix `SCHOLAR_HARVEST`). Every section and field has a default, so an
//! absent or partial file is fine.
//!
//! # Configuration File Format
//!
//! ```toml
//! [search]
//! base_url = "https://scholar.google.com"
//! num_results = 10
//!
//! [http]
//! timeout_secs = 10
//! referer = "https://scholar.google.com/"
//!
//! [downloads]
//! dir = "pdfs"
//! fallback_filename = "article.pdf"
//! timeout_secs = 15
//!
//! [enrich]
//! courtesy_delay_ms = 1000
//! max_concurrency = 1
//! abstract_scan_chars = 4000
//! abstract_take_chars = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::enrich::SectionPatterns;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search engine settings
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// PDF download settings
    #[serde(default)]
    pub downloads: DownloadConfig,

    /// Enrichment pipeline settings
    #[serde(default)]
    pub enrich: EnrichConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            http: HttpConfig::default(),
            downloads: DownloadConfig::default(),
            enrich: EnrichConfig::default(),
        }
    }
}

/// Search engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Origin of the search engine; results-page and related-article URLs
    /// resolve against this
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How many results to request per search
    #[serde(default = "default_num_results")]
    pub num_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            num_results: default_num_results(),
        }
    }
}

fn default_base_url() -> String {
    "https://scholar.google.com".to_string()
}

fn default_num_results() -> usize {
    10
}

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Referer header sent with every request
    #[serde(default = "default_referer")]
    pub referer: String,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            referer: default_referer(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_referer() -> String {
    "https://scholar.google.com/".to_string()
}

/// PDF download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory for downloaded PDFs, created on demand
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,

    /// Filename used when the URL path has no basename
    #[serde(default = "default_fallback_filename")]
    pub fallback_filename: String,

    /// Download timeout in seconds; PDFs get longer than regular pages
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
}

impl DownloadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
            fallback_filename: default_fallback_filename(),
            timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("pdfs")
}

fn default_fallback_filename() -> String {
    "article.pdf".to_string()
}

fn default_download_timeout_secs() -> u64 {
    15
}

/// Enrichment pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Pause between records, to stay polite with the remote hosts
    #[serde(default = "default_courtesy_delay_ms")]
    pub courtesy_delay_ms: u64,

    /// Records enriched at a time. Only 1 is supported today; values above 1
    /// are reserved for a future bounded-concurrency loop.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// How far into the PDF text to look for the word "abstract"
    #[serde(default = "default_abstract_scan_chars")]
    pub abstract_scan_chars: usize,

    /// How many characters after "abstract" to take as the candidate
    #[serde(default = "default_abstract_take_chars")]
    pub abstract_take_chars: usize,

    /// Heading and boundary heuristics for section location
    #[serde(default)]
    pub section: SectionPatterns,
}

impl EnrichConfig {
    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms)
    }
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            courtesy_delay_ms: default_courtesy_delay_ms(),
            max_concurrency: default_max_concurrency(),
            abstract_scan_chars: default_abstract_scan_chars(),
            abstract_take_chars: default_abstract_take_chars(),
            section: SectionPatterns::default(),
        }
    }
}

fn default_courtesy_delay_ms() -> u64 {
    1000
}

fn default_max_concurrency() -> usize {
    1
}

fn default_abstract_scan_chars() -> usize {
    4000
}

fn default_abstract_take_chars() -> usize {
    1000
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("SCHOLAR_HARVEST"))
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in the working directory, then the user config dir
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("scholar-harvest.toml");
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("scholar-harvest").join("config.toml");
    user.exists().then_some(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.num_results, 10);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.downloads.timeout_secs, 15);
        assert_eq!(config.enrich.max_concurrency, 1);
        assert_eq!(config.enrich.courtesy_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholar-harvest.toml");
        std::fs::write(&path, "[search]\nnum_results = 5\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.search.num_results, 5);
        assert_eq!(config.search.base_url, "https://scholar.google.com");
        assert_eq!(config.downloads.fallback_filename, "article.pdf");
    }
}
