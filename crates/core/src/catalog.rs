//! Projection of storefront catalog exports into product summaries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::null_as_default;
use crate::domain::product::ProductSummary;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read product file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse product document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported product document: {0}")]
    UnsupportedShape(String),
}

/// Product node as returned by the storefront admin GraphQL API.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogProduct {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub vendor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub variants: Connection<CatalogVariant>,
    pub images: Connection<Value>,
    pub seo: Option<CatalogSeo>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogVariant {
    pub price: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSeo {
    pub title: Option<String>,
}

impl CatalogProduct {
    /// Price of the first variant. Unparseable or missing prices read as 0.
    pub fn first_price(&self) -> f64 {
        self.variants
            .edges
            .first()
            .and_then(|edge| edge.node.price.as_ref())
            .map(price_value)
            .unwrap_or(0.0)
    }

    pub fn summarize(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            product_type: self.product_type.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            price: self.first_price(),
            vendor: self.vendor.clone(),
            status: self.status.clone(),
            image_count: u32::try_from(self.images.edges.len()).unwrap_or(u32::MAX),
            has_seo: self
                .seo
                .as_ref()
                .and_then(|seo| seo.title.as_deref())
                .is_some_and(|title| !title.trim().is_empty()),
        }
    }
}

impl From<&CatalogProduct> for ProductSummary {
    fn from(product: &CatalogProduct) -> Self {
        product.summarize()
    }
}

fn price_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Reads product summaries from any of the supported document shapes:
/// a bare array, `{"products": [...]}`, or a GraphQL
/// `{"data": {"products": {"edges": [{"node": ...}]}}}` response. Array items
/// carrying `productType` are treated as catalog nodes, anything else as an
/// existing summary.
pub fn parse_products(raw: &str) -> Result<Vec<ProductSummary>, CatalogError> {
    let document: Value = serde_json::from_str(raw)?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(CatalogError::UnsupportedShape(
                    "`products` must be an array".to_string(),
                ))
            }
            None => graphql_nodes(map.remove("data"))?,
        },
        _ => {
            return Err(CatalogError::UnsupportedShape(
                "expected an array or object at the top level".to_string(),
            ))
        }
    };

    items.into_iter().map(summary_from_item).collect()
}

pub fn load_products(path: &Path) -> Result<Vec<ProductSummary>, CatalogError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
    parse_products(&raw)
}

fn graphql_nodes(data: Option<Value>) -> Result<Vec<Value>, CatalogError> {
    let edges = data
        .as_ref()
        .and_then(|data| data.pointer("/products/edges"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CatalogError::UnsupportedShape(
                "expected `products` or `data.products.edges`".to_string(),
            )
        })?;

    Ok(edges.iter().filter_map(|edge| edge.get("node").cloned()).collect())
}

fn summary_from_item(item: Value) -> Result<ProductSummary, CatalogError> {
    if item.get("productType").is_some() {
        let node: CatalogProduct = serde_json::from_value(item)?;
        Ok(node.summarize())
    } else {
        Ok(serde_json::from_value(item)?)
    }
}
