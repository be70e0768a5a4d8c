use crate::domain::product::ProductSummary;

/// Lower-cased `title type description tags...` search corpus.
pub fn normalize_corpus(product: &ProductSummary) -> String {
    format!(
        "{} {} {} {}",
        product.title,
        product.product_type,
        product.description,
        product.tags.join(" ")
    )
    .to_lowercase()
}

/// Case-folded views of one product, built once per matching pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductText {
    pub title: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub corpus: String,
}

impl ProductText {
    pub fn from_product(product: &ProductSummary) -> Self {
        Self {
            title: product.title.to_lowercase(),
            product_type: product.product_type.to_lowercase(),
            tags: product.tags.iter().map(|tag| tag.to_lowercase()).collect(),
            corpus: normalize_corpus(product),
        }
    }
}
