use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Externally sourced marketing or aesthetic theme.
///
/// Only `keywords`, `target_products` and `hashtags` feed the deterministic
/// matcher; the remaining fields give the generative path more context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub target_products: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hashtags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub marketing_angle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color_palette: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub popularity_score: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub platforms: Vec<String>,
}

impl TrendSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), ..Self::default() }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_products<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_products = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hashtags<I, S>(mut self, hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hashtags = hashtags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_popularity(mut self, score: u32) -> Self {
        self.popularity_score = score;
        self
    }
}
