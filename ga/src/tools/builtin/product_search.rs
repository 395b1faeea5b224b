//! Product search and recommendation tool (mock catalog)

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::upstream_result;
use crate::tools::{ExecutionContext, Tool, ToolError};

/// Registry key for the product search tool
pub const PRODUCT_SEARCH_TOOL: &str = "function_product_search";

/// Catalog search and recommendation matching
///
/// Actions: `search_products` (keyword + filter match over the in-memory
/// catalog) and `match_recommendations` (ranks a prior search result by
/// price). The catalog is a fixed mock data set; the real service sits
/// behind a vector search the core never sees.
pub struct ProductSearchTool {
    catalog: Vec<Value>,
}

impl ProductSearchTool {
    pub fn new() -> Self {
        Self {
            catalog: vec![
                json!({
                    "id": "prod_001",
                    "name": "오버사이즈 후드티",
                    "category": "상의",
                    "style": "스트리트",
                    "color": "검정색",
                    "price": 89000,
                    "brand": "StreetWear",
                    "available": true
                }),
                json!({
                    "id": "prod_002",
                    "name": "슬림핏 후드티",
                    "category": "상의",
                    "style": "캐주얼",
                    "color": "회색",
                    "price": 69000,
                    "brand": "CasualWear",
                    "available": true
                }),
                json!({
                    "id": "prod_003",
                    "name": "데님 재킷",
                    "category": "아우터",
                    "style": "캐주얼",
                    "color": "청색",
                    "price": 129000,
                    "brand": "DenimCo",
                    "available": true
                }),
            ],
        }
    }

    fn search_products(&self, parameters: &Map<String, Value>) -> Result<Value, ToolError> {
        let query = parameters
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_lowercase();
        let filters = parameters.get("filters").and_then(Value::as_object);
        debug!(%query, has_filters = filters.is_some(), "ProductSearchTool::search_products: called");

        let results: Vec<Value> = self
            .catalog
            .iter()
            .filter(|product| {
                let matches_query = if query.is_empty() {
                    true
                } else {
                    ["name", "category", "style"].iter().any(|field| {
                        product
                            .get(field)
                            .and_then(Value::as_str)
                            .is_some_and(|v| v.to_lowercase().contains(&query))
                    })
                };

                let matches_filters = filters.is_none_or(|f| {
                    f.iter().all(|(key, expected)| product.get(key) == Some(expected))
                });

                let available = product.get("available").and_then(Value::as_bool).unwrap_or(false);

                matches_query && matches_filters && available
            })
            .cloned()
            .collect();

        debug!(count = results.len(), "ProductSearchTool::search_products: matched");
        Ok(json!({
            "status": "success",
            "count": results.len(),
            "query": query,
            "message": format!("{}개의 상품을 찾았습니다.", results.len()),
            "products": results
        }))
    }

    fn match_recommendations(
        &self,
        parameters: &Map<String, Value>,
        context: &ExecutionContext,
    ) -> Result<Value, ToolError> {
        debug!("ProductSearchTool::match_recommendations: called");
        let search_result = upstream_result(parameters, context, 1)
            .ok_or_else(|| ToolError::MissingInput("상품 검색 결과가 필요합니다.".to_string()))?;

        let mut products: Vec<Value> = search_result
            .get("products")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        // Cheapest-first is the whole of the ranking model.
        products.sort_by_key(|p| p.get("price").and_then(Value::as_i64).unwrap_or(i64::MAX));
        products.truncate(3);

        debug!(count = products.len(), "ProductSearchTool::match_recommendations: ranked");
        Ok(json!({
            "status": "success",
            "count": products.len(),
            "message": format!("{}개의 추천 상품이 준비되었습니다.", products.len()),
            "recommendations": products
        }))
    }
}

impl Default for ProductSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ProductSearchTool {
    fn name(&self) -> &str {
        PRODUCT_SEARCH_TOOL
    }

    async fn invoke(
        &self,
        action: &str,
        parameters: &Map<String, Value>,
        context: &mut ExecutionContext,
    ) -> Result<Value, ToolError> {
        debug!(%action, "ProductSearchTool::invoke: called");
        match action {
            "search_products" => self.search_products(parameters),
            "match_recommendations" => self.match_recommendations(parameters, context),
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}
