//! Recipes API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use validator::Validate;

use types::{
    CreateRecipeRequest, LookupRecipesRequest, RecipeResponse, ScrapedImportResponse,
    ScrapedRecipeRequest, SearchRequest, UpdateRecipeRequest, convert_filters,
};

use crate::api::types::ApiError;
use crate::data::mongo::parse_object_id;
use crate::domain::RecipeService;
use crate::domain::recipes::{NewRecipe, RecipeUpdate, ScrapedRecipe};

/// Shared state for Recipes API endpoints
#[derive(Clone)]
pub struct RecipesApiState {
    pub recipes: Arc<RecipeService>,
}

/// Build the read-only recipe routes (no bearer token required)
pub fn routes(recipes: Arc<RecipeService>) -> Router<()> {
    let state = RecipesApiState { recipes };

    Router::new()
        .route("/search", post(search))
        .route("/lookup", post(lookup))
        .route("/{id}", get(get_recipe))
        .with_state(state)
}

/// Build the recipe mutation routes (bearer token enforced when enabled)
pub fn mutation_routes(recipes: Arc<RecipeService>) -> Router<()> {
    let state = RecipesApiState { recipes };

    Router::new()
        .route("/", post(create_recipe))
        .route("/scraped", post(import_scraped))
        .route("/{id}", put(update_recipe).delete(delete_recipe))
        .route("/{id}/photos", post(upload_photos))
        .with_state(state)
}

/// Full-text search over published recipes
pub async fn search(
    State(state): State<RecipesApiState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let page = request.page.clamped();
    let filters = convert_filters(request.filters);
    let results = state
        .recipes
        .search_public(&request.phrase, &filters, page.limit, page.offset)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// Fetch a page of recipes by id
pub async fn lookup(
    State(state): State<RecipesApiState>,
    Json(request): Json<LookupRecipesRequest>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let page = request.page.clamped();
    let ids = parse_ids(&request.ids)?;
    let results = state
        .recipes
        .find_many(&ids, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

pub async fn get_recipe(
    State(state): State<RecipesApiState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe = state
        .recipes
        .find_by_id(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("RECIPE_NOT_FOUND", "Recipe not found"))?;
    Ok(Json(recipe.into()))
}

pub async fn create_recipe(
    State(state): State<RecipesApiState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request("VALIDATION_FAILED", e.to_string()))?;
    let author = parse_object_id(&request.author).map_err(ApiError::from_data)?;
    let recipe = state
        .recipes
        .create(NewRecipe {
            description: request.description,
            system: request.system,
            name: request.name,
            ingredients: request.ingredients,
            instructions: request.instructions,
            source_url: request.source_url,
            prep_time: request.prep_time,
            cook_time: request.cook_time,
            difficulty: request.difficulty,
            servings: request.servings,
            notes: request.notes,
            tags: request.tags,
            published: request.published,
            author,
            image_uris: request.images,
        })
        .await
        .map_err(ApiError::from_data)?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

/// Import a recipe scraped from an external site
pub async fn import_scraped(
    State(state): State<RecipesApiState>,
    Json(request): Json<ScrapedRecipeRequest>,
) -> Result<Json<ScrapedImportResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request("VALIDATION_FAILED", e.to_string()))?;
    let author = parse_object_id(&request.author).map_err(ApiError::from_data)?;
    let result = state
        .recipes
        .import_scraped(ScrapedRecipe {
            description: request.description,
            system: request.system,
            name: request.name,
            ingredients: request.ingredients,
            instructions: request.instructions,
            source_url: request.source_url,
            prep_time: request.prep_time,
            cook_time: request.cook_time,
            difficulty: request.difficulty,
            servings: request.servings,
            notes: request.notes,
            tags: request.tags,
            author,
            image_uri: request.image,
        })
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(ScrapedImportResponse {
        result: result.message(),
    }))
}

pub async fn update_recipe(
    State(state): State<RecipesApiState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe = state
        .recipes
        .update(
            id,
            RecipeUpdate {
                description: request.description,
                system: request.system,
                name: request.name,
                ingredients: request.ingredients,
                instructions: request.instructions,
                source_url: request.source_url,
                prep_time: request.prep_time,
                cook_time: request.cook_time,
                difficulty: request.difficulty,
                servings: request.servings,
                notes: request.notes,
                tags: request.tags,
                published: request.published,
                images_to_add: request.images_to_add,
                images_to_remove: request.images_to_remove,
            },
        )
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("RECIPE_NOT_FOUND", "Recipe not found"))?;
    Ok(Json(recipe.into()))
}

pub async fn delete_recipe(
    State(state): State<RecipesApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let deleted = state
        .recipes
        .delete(id)
        .await
        .map_err(ApiError::from_data)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("RECIPE_NOT_FOUND", "Recipe not found"))
    }
}

/// Attach uploaded photo files to a recipe
///
/// Each multipart field is one photo; field names are ignored. Returns the
/// recipe with the new public URLs appended to its image list.
pub async fn upload_photos(
    State(state): State<RecipesApiState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<RecipeResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let mut photos = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request("INVALID_MULTIPART", e.to_string()))?
    {
        let filename = field.file_name().unwrap_or("photo").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request("INVALID_MULTIPART", e.to_string()))?;
        photos.push((filename, content_type, bytes.to_vec()));
    }
    if photos.is_empty() {
        return Err(ApiError::bad_request(
            "NO_PHOTOS",
            "Request contains no photo parts",
        ));
    }
    let recipe = state
        .recipes
        .add_photos(id, photos)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("RECIPE_NOT_FOUND", "Recipe not found"))?;
    Ok(Json(recipe.into()))
}

/// Parse a list of caller-supplied ids, rejecting the whole request on the
/// first malformed one
pub fn parse_ids(ids: &[String]) -> Result<Vec<bson::oid::ObjectId>, ApiError> {
    ids.iter()
        .map(|id| parse_object_id(id).map_err(ApiError::from_data))
        .collect()
}
