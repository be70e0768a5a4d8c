//! Trend library loaded from a JSON document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::trend::TrendSummary;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("could not read trend file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse trend document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TrendDocument {
    Bare(Vec<TrendSummary>),
    Wrapped {
        #[serde(default)]
        trends: Vec<TrendSummary>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrendLibrary {
    trends: Vec<TrendSummary>,
}

impl TrendLibrary {
    pub fn new(trends: Vec<TrendSummary>) -> Self {
        Self { trends }
    }

    /// Accepts either `{"trends": [...]}` or a bare array of trends.
    pub fn from_json_str(raw: &str) -> Result<Self, LibraryError> {
        let trends = match serde_json::from_str::<TrendDocument>(raw)? {
            TrendDocument::Bare(trends) | TrendDocument::Wrapped { trends } => trends,
        };
        Ok(Self { trends })
    }

    /// Loads the library from disk. A missing file is an empty library.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        if !path.exists() {
            warn!(
                event_name = "library.trends.missing",
                path = %path.display(),
                "trend file not found, continuing with no trends"
            );
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .map_err(|source| LibraryError::ReadFile { path: path.to_path_buf(), source })?;
        let library = Self::from_json_str(&raw)?;

        info!(
            event_name = "library.trends.loaded",
            path = %path.display(),
            trends = library.len(),
            "trend library loaded"
        );
        Ok(library)
    }

    pub fn trends(&self) -> &[TrendSummary] {
        &self.trends
    }

    pub fn into_trends(self) -> Vec<TrendSummary> {
        self.trends
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }

    pub fn get(&self, trend_id: &str) -> Option<&TrendSummary> {
        self.trends.iter().find(|trend| trend.id == trend_id)
    }

    pub fn by_platform(&self, platform: &str) -> Vec<&TrendSummary> {
        self.trends.iter().filter(|trend| trend.platforms.iter().any(|p| p == platform)).collect()
    }

    /// Most popular trends first; equal scores keep library order.
    pub fn top(&self, limit: usize) -> Vec<&TrendSummary> {
        let mut ranked: Vec<&TrendSummary> = self.trends.iter().collect();
        ranked.sort_by(|a, b| b.popularity_score.cmp(&a.popularity_score));
        ranked.truncate(limit);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{LibraryError, TrendLibrary};

    const SAMPLE: &str = r##"{
        "trends": [
            {
                "id": "trend_001",
                "name": "Aura Aesthetic",
                "keywords": ["ethereal", "soft"],
                "target_products": ["trench coats", "blazers"],
                "hashtags": ["#aura"],
                "popularity_score": 92,
                "platforms": ["TikTok", "Instagram"]
            },
            {
                "id": "trend_002",
                "name": "Gorpcore",
                "target_products": ["fleece jackets"],
                "popularity_score": 78,
                "platforms": ["Instagram"]
            },
            {
                "id": "trend_003",
                "name": "Quiet Luxury",
                "target_products": ["cashmere sweaters"],
                "popularity_score": 92,
                "platforms": ["Pinterest"]
            }
        ]
    }"##;

    #[test]
    fn parses_wrapped_document() {
        let library = TrendLibrary::from_json_str(SAMPLE).expect("sample should parse");

        assert_eq!(library.len(), 3);
        let aura = library.get("trend_001").expect("aura should exist");
        assert_eq!(aura.hashtags, vec!["#aura".to_string()]);
        assert!(library.get("trend_404").is_none());
    }

    #[test]
    fn parses_bare_array() {
        let library = TrendLibrary::from_json_str(r#"[{"id": "t1", "name": "Y2K"}]"#)
            .expect("bare array should parse");

        assert_eq!(library.trends()[0].name, "Y2K");
    }

    #[test]
    fn document_without_trends_key_is_empty() {
        let library = TrendLibrary::from_json_str(r#"{"generated": "today"}"#)
            .expect("object without trends should parse");

        assert!(library.is_empty());
    }

    #[test]
    fn filters_by_platform() {
        let library = TrendLibrary::from_json_str(SAMPLE).expect("sample should parse");

        let ids: Vec<&str> =
            library.by_platform("Instagram").iter().map(|trend| trend.id.as_str()).collect();

        assert_eq!(ids, vec!["trend_001", "trend_002"]);
        assert!(library.by_platform("instagram").is_empty());
    }

    #[test]
    fn top_orders_by_popularity_and_truncates() {
        let library = TrendLibrary::from_json_str(SAMPLE).expect("sample should parse");

        let ids: Vec<&str> = library.top(2).iter().map(|trend| trend.id.as_str()).collect();

        assert_eq!(ids, vec!["trend_001", "trend_003"]);
        assert_eq!(library.top(10).len(), 3);
    }

    #[test]
    fn missing_file_yields_empty_library() {
        let dir = TempDir::new().expect("tempdir");
        let library = TrendLibrary::load(&dir.path().join("absent.json")).expect("missing is ok");

        assert!(library.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("trends.json");
        fs::write(&path, "{ not json").expect("write fixture");

        assert!(matches!(TrendLibrary::load(&path), Err(LibraryError::Parse(_))));
    }
}
