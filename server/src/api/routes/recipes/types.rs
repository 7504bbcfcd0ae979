//! Request and response types for the recipes API
//!
//! Responses use the camelCase wire format existing clients expect,
//! including the legacy `sourceURL` spelling.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::types::PageParams;
use crate::data::mongo::filters::Filter;
use crate::data::mongo::models::RecipeDoc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: String,
    pub created: String,
    pub description: String,
    pub system: String,
    pub images: Vec<String>,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: i64,
    pub servings: i64,
    pub rating: f64,
    pub author: String,
    pub notes: Vec<String>,
    pub num_reviews: i64,
    pub num_shares: i64,
    pub tags: Vec<String>,
    pub comments: Vec<String>,
    pub published: bool,
}

impl From<RecipeDoc> for RecipeResponse {
    fn from(recipe: RecipeDoc) -> Self {
        Self {
            id: recipe.id.map(|id| id.to_hex()).unwrap_or_default(),
            created: recipe.created.to_rfc3339(),
            description: recipe.description,
            system: recipe.system,
            images: recipe.images,
            name: recipe.name,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            source_url: recipe.source_url,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            difficulty: recipe.difficulty,
            servings: recipe.servings,
            rating: recipe.rating,
            author: recipe.author.to_hex(),
            notes: recipe.notes,
            num_reviews: recipe.num_reviews,
            num_shares: recipe.num_shares,
            tags: recipe.tags,
            comments: recipe.comments,
            published: recipe.published,
        }
    }
}

/// One search filter as sent by clients
///
/// The wire field is `value` (plural contents, singular name) for
/// compatibility with existing clients.
#[derive(Debug, Deserialize)]
pub struct SearchFilterInput {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Vec<String>,
}

impl From<SearchFilterInput> for Filter {
    fn from(input: SearchFilterInput) -> Self {
        Filter::new(input.field, input.operator, input.value)
    }
}

/// Convert wire filters, noting incomplete ones
///
/// Incomplete filters are passed through regardless; validity is advisory
/// and the translator drops only unrecognized operators.
pub fn convert_filters(inputs: Vec<SearchFilterInput>) -> Vec<Filter> {
    let filters: Vec<Filter> = inputs.into_iter().map(Into::into).collect();
    if filters.iter().any(|f| !f.is_valid()) {
        tracing::debug!("Search request contains incomplete filters");
    }
    filters
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub phrase: String,
    #[serde(default)]
    pub filters: Vec<SearchFilterInput>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRecipesRequest {
    pub ids: Vec<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

fn default_system() -> String {
    "us".to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    pub description: String,
    #[serde(default = "default_system")]
    pub system: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "at least one ingredient is required"))]
    pub ingredients: Vec<String>,
    #[validate(length(min = 1, message = "at least one instruction step is required"))]
    pub instructions: Vec<String>,
    #[serde(rename = "sourceURL", default)]
    pub source_url: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: i64,
    pub servings: i64,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub author: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedRecipeRequest {
    pub description: String,
    #[serde(default = "default_system")]
    pub system: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(rename = "sourceURL", default)]
    pub source_url: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: i64,
    pub servings: i64,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    #[validate(url(message = "image must be a valid URL"))]
    pub image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeRequest {
    pub description: Option<String>,
    pub system: Option<String>,
    pub name: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub difficulty: Option<i64>,
    pub servings: Option<i64>,
    pub notes: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    #[serde(default)]
    pub images_to_add: Vec<String>,
    #[serde(default)]
    pub images_to_remove: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapedImportResponse {
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use chrono::Utc;

    #[test]
    fn test_recipe_response_wire_field_names() {
        let recipe = RecipeDoc {
            id: Some(ObjectId::new()),
            created: Utc::now(),
            description: "desc".into(),
            system: "us".into(),
            images: vec![],
            name: "Pho".into(),
            ingredients: vec![],
            instructions: vec![],
            source_url: "https://example.com".into(),
            prep_time: 10,
            cook_time: 20,
            difficulty: 2,
            servings: 4,
            rating: 4.5,
            author: ObjectId::new(),
            notes: vec![],
            num_reviews: 3,
            num_shares: 1,
            tags: vec!["soup".into()],
            comments: vec![],
            published: true,
        };
        let json = serde_json::to_value(RecipeResponse::from(recipe)).unwrap();
        assert_eq!(json["sourceURL"], "https://example.com");
        assert_eq!(json["prepTime"], 10);
        assert_eq!(json["numReviews"], 3);
        assert!(json["author"].is_string());
    }

    #[test]
    fn test_search_request_defaults() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"phrase": "chicken"}"#).unwrap();
        assert_eq!(request.phrase, "chicken");
        assert!(request.filters.is_empty());
        assert_eq!(request.page.offset, 0);
    }

    #[test]
    fn test_search_filter_wire_format_uses_singular_value() {
        let input: SearchFilterInput = serde_json::from_str(
            r#"{"field": "tags", "operator": "IN", "value": ["spicy", "vegan"]}"#,
        )
        .unwrap();
        let filter: Filter = input.into();
        assert_eq!(filter.field, "tags");
        assert_eq!(filter.values, vec!["spicy", "vegan"]);
    }

    #[test]
    fn test_create_recipe_request_rejects_empty_name() {
        let request: CreateRecipeRequest = serde_json::from_str(
            r#"{
                "description": "d", "name": "", "ingredients": ["x"],
                "instructions": ["y"], "prepTime": 1, "cookTime": 1,
                "difficulty": 1, "servings": 1, "author": "abc"
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_convert_filters_keeps_incomplete_filters() {
        let filters = convert_filters(vec![SearchFilterInput {
            field: String::new(),
            operator: "EQ".to_string(),
            value: vec!["x".to_string()],
        }]);
        assert_eq!(filters.len(), 1);
        assert!(!filters[0].is_valid());
    }
}
