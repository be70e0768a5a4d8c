use trendfit_core::{ProductSummary, TrendSummary};

/// Builds the analyst prompt asking the model for a match report in the same
/// JSON shape the rule-based matcher produces.
pub fn build_match_prompt(
    products: &[ProductSummary],
    trends: &[TrendSummary],
) -> Result<String, serde_json::Error> {
    let products_json = serde_json::to_string_pretty(products)?;
    let trends_json = serde_json::to_string_pretty(trends)?;

    Ok(format!(
        r#"You are a fashion trend analyst. Your task is to match products to current trends.

CURRENT TRENDS:
{trends_json}

Each trend has:
- id: Unique identifier (e.g., "trend_001")
- name: The trend name (e.g., "Aura Aesthetic")
- target_products: Product types that fit this trend (e.g., ["trench coats", "blazers"])
- keywords: Style keywords associated with the trend
- hashtags: Social hashtags used for the trend
- color_palette: Colors that match the trend
- marketing_angle: How to market products for this trend

PRODUCTS TO ANALYZE:
{products_json}

Each product has:
- id: Product identifier
- title: Product name
- type: Product category
- description: Current product description
- tags: Product tags

TASK:
1. For each product, check if it matches any trend based on:
   - Product type/title matching the trend's target_products (MOST IMPORTANT)
   - Product title/description containing trend keywords
   - Product tags aligning with trend hashtags
2. A product can match multiple trends.
3. Only include matches with confidence >= 50 (integer, at most 100).
4. Every product must appear exactly once, either in "matches" or in "unmatched_products".
5. Order each product's matched_trends by confidence, highest first, and give at least one reason per match.

Return ONLY a JSON object with this exact structure:
{{
    "matches": [
        {{
            "product_id": "gid://shopify/Product/123",
            "product_title": "Classic Trench Coat",
            "product_type": "Coats",
            "matched_trends": [
                {{
                    "trend_name": "Aura Aesthetic",
                    "trend_id": "trend_001",
                    "confidence": 92,
                    "match_reasons": ["'trench coats' in target_products matches product title"]
                }}
            ]
        }}
    ],
    "unmatched_products": [
        {{
            "product_id": "gid://shopify/Product/456",
            "product_title": "Basic Socks",
            "reason": "No matching target_products found in any trend"
        }}
    ]
}}

Return ONLY valid JSON, no other text."#
    ))
}

/// Strips the markdown code fence models like to wrap JSON in.
pub fn clean_response(response_text: &str) -> &str {
    let mut text = response_text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}
