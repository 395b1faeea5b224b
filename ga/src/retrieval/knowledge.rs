//! In-memory garment knowledge base

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{KnowledgeRetriever, RetrievalContext, Suggestion};

/// Static rule/data knowledge base
///
/// Four tables - garment types, styles, materials, color guidelines -
/// queried by case-insensitive substring match. Five matches saturate the
/// confidence score.
pub struct StaticKnowledgeBase {
    tables: Map<String, Value>,
}

impl StaticKnowledgeBase {
    pub fn new() -> Self {
        let tables = json!({
            "garment_types": {
                "상의": ["후드티", "티셔츠", "셔츠", "블라우스"],
                "하의": ["바지", "청바지", "스커트", "반바지"],
                "아우터": ["재킷", "코트", "패딩", "바람막이"]
            },
            "styles": {
                "스트리트": "오버사이즈, 힙합, 그래피티 스타일",
                "캐주얼": "편안한 일상 복장, 데일리 룩",
                "포멀": "정장, 비즈니스 캐주얼",
                "스포츠": "운동복, 활동적인 스타일"
            },
            "materials": {
                "면": "통기성 좋음, 세탁 쉬움",
                "폴리에스터": "구김 적음, 빠른 건조",
                "데님": "내구성 좋음, 캐주얼 스타일"
            },
            "color_guidelines": {
                "검정색": "모든 스타일과 어울림, 슬림하게 보임",
                "흰색": "깔끔한 느낌, 여름에 적합",
                "회색": "중성적, 다양한 색상과 매칭 가능"
            }
        });
        let Value::Object(tables) = tables else {
            unreachable!("knowledge base literal is an object");
        };
        Self { tables }
    }
}

impl Default for StaticKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeRetriever for StaticKnowledgeBase {
    async fn retrieve(&self, query: &str) -> RetrievalContext {
        let query = query.to_lowercase();
        debug!(query_len = query.len(), "StaticKnowledgeBase::retrieve: called");

        let mut context = RetrievalContext::default();
        if query.is_empty() {
            return context;
        }

        for (category, table) in &self.tables {
            let Some(entries) = table.as_object() else { continue };
            for (key, value) in entries {
                let value_text = value.to_string().to_lowercase();
                if key.to_lowercase().contains(&query) || value_text.contains(&query) {
                    context.suggestions.push(Suggestion {
                        category: category.clone(),
                        key: key.clone(),
                        value: value.clone(),
                    });
                    context.relevant_info.insert(category.clone(), table.clone());
                }
            }
        }

        if !context.suggestions.is_empty() {
            context.confidence = (context.suggestions.len() as f64 / 5.0).min(1.0);
        }

        debug!(
            matches = context.suggestions.len(),
            confidence = context.confidence,
            "StaticKnowledgeBase::retrieve: done"
        );
        context
    }
}
