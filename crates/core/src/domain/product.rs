use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Matching-ready projection of a catalog product.
///
/// Every field defaults when absent (or `null`) in the source document, so a
/// partially populated record still takes part in a matching pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub product_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub vendor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub image_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub has_seo: bool,
}

impl ProductSummary {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        product_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            product_type: product_type.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ProductSummary;

    #[test]
    fn missing_and_null_fields_fall_back_to_empty_values() {
        let product: ProductSummary = serde_json::from_str(
            r#"{"id": "gid://shopify/Product/1", "title": null, "type": "Coats"}"#,
        )
        .expect("summary should deserialize");

        assert_eq!(product.id, "gid://shopify/Product/1");
        assert_eq!(product.title, "");
        assert_eq!(product.product_type, "Coats");
        assert!(product.tags.is_empty());
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn product_type_serializes_under_type_key() {
        let product = ProductSummary::new("p1", "Wool Blazer", "Outerwear");
        let value = serde_json::to_value(&product).expect("summary should serialize");

        assert_eq!(value["type"], "Outerwear");
        assert!(value.get("product_type").is_none());
    }
}
