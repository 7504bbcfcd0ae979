//! Users API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use types::{
    FollowRequest, GroupListParams, LookupUsersRequest, MadeRecipeRequest, RecipeGroupResponse,
    RenameGroupRequest, SaveRecipeRequest, UpdateUserRequest, UserResponse,
};

use crate::api::routes::recipes::parse_ids;
use crate::api::routes::recipes::types::{RecipeResponse, SearchRequest, convert_filters};
use crate::api::types::{ApiError, ListParams};
use crate::data::mongo::parse_object_id;
use crate::domain::UserService;
use crate::domain::users::UserUpdate;

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub users: Arc<UserService>,
}

/// Build the read-only user routes (no bearer token required)
pub fn routes(users: Arc<UserService>) -> Router<()> {
    let state = UsersApiState { users };

    Router::new()
        .route("/lookup", post(lookup))
        .route("/by-username/{username}", get(get_user_by_username))
        .route("/{id}", get(get_user))
        .route("/{id}/owned-recipes", get(list_owned))
        .route("/{id}/owned-recipes/search", post(search_owned))
        .route("/{id}/saved-recipes", get(list_saved))
        .route("/{id}/saved-recipes/search", post(search_saved))
        .route("/{id}/made-recipes", get(list_made))
        .route("/{id}/followers", get(list_followers))
        .route("/{id}/following", get(list_following))
        .route("/{id}/recipe-groups", get(list_groups))
        .with_state(state)
}

/// Build the user mutation routes (bearer token enforced when enabled)
pub fn mutation_routes(users: Arc<UserService>) -> Router<()> {
    let state = UsersApiState { users };

    Router::new()
        .route("/{id}", put(update_user).delete(delete_user))
        .route("/{id}/saved-recipes", post(save_recipe))
        .route("/{id}/saved-recipes/{recipe_id}", delete(delete_saved))
        .route(
            "/{id}/recipe-groups/{group_name}",
            put(rename_group).delete(delete_group),
        )
        .route("/{id}/recipe-groups/{group_name}/recipes", post(add_to_group))
        .route(
            "/{id}/recipe-groups/{group_name}/recipes/{recipe_id}",
            delete(remove_from_group),
        )
        .route("/{id}/following", post(follow))
        .route("/{id}/following/{target_id}", delete(unfollow))
        .route("/{id}/made-recipes/{recipe_id}", put(set_made))
        .with_state(state)
}

fn user_not_found() -> ApiError {
    ApiError::not_found("USER_NOT_FOUND", "User not found")
}

pub async fn get_user(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .find_by_id(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

/// Fetch a page of users by id
pub async fn lookup(
    State(state): State<UsersApiState>,
    Json(request): Json<LookupUsersRequest>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let page = request.page.clamped();
    let ids = parse_ids(&request.ids)?;
    let results = state
        .users
        .find_many(&ids, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

pub async fn get_user_by_username(
    State(state): State<UsersApiState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_by_username(&username)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

/// Page through the recipes the user authored
pub async fn list_owned(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = params.page();
    let results = state
        .users
        .list_owned(id, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// Page through the user's saved recipe copies
pub async fn list_saved(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = params.page();
    let results = state
        .users
        .list_saved(id, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// Page through the recipes the user marked as made
pub async fn list_made(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = params.page();
    let results = state
        .users
        .list_made(id, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

pub async fn list_followers(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = params.page();
    let results = state
        .users
        .list_followers(id, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

pub async fn list_following(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = params.page();
    let results = state
        .users
        .list_following(id, page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// List recipe groups, optionally narrowed by a name substring
pub async fn list_groups(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Query(params): Query<GroupListParams>,
) -> Result<Json<Vec<RecipeGroupResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = ListParams {
        limit: params.limit,
        offset: params.offset,
    }
    .page();
    let groups = state
        .users
        .list_groups(id, params.name.as_deref(), page.offset, page.limit)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

pub async fn update_user(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .update(
            id,
            UserUpdate {
                username: request.username,
                email: request.email,
                password: request.password,
                profile_picture_uri: request.profile_picture_uri,
            },
        )
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let deleted = state.users.delete(id).await.map_err(ApiError::from_data)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(user_not_found())
    }
}

/// Save a private copy of a recipe into the user's recipe box
pub async fn save_recipe(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Json(request): Json<SaveRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe_id = parse_object_id(&request.recipe_id).map_err(ApiError::from_data)?;
    let copy = state
        .users
        .save_recipe(id, recipe_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("RECIPE_NOT_FOUND", "Recipe not found"))?;
    Ok((StatusCode::CREATED, Json(copy.into())))
}

pub async fn delete_saved(
    State(state): State<UsersApiState>,
    Path((id, recipe_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe_id = parse_object_id(&recipe_id).map_err(ApiError::from_data)?;
    let found = state
        .users
        .delete_saved_recipe(id, recipe_id)
        .await
        .map_err(ApiError::from_data)?;
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(user_not_found())
    }
}

/// Search the user's saved recipe copies
pub async fn search_saved(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = request.page.clamped();
    let filters = convert_filters(request.filters);
    let results = state
        .users
        .search_saved(id, &request.phrase, &filters, page.limit, page.offset)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

/// Search the recipes the user authored
pub async fn search_owned(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let page = request.page.clamped();
    let filters = convert_filters(request.filters);
    let results = state
        .users
        .search_owned(id, &request.phrase, &filters, page.limit, page.offset)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

pub async fn add_to_group(
    State(state): State<UsersApiState>,
    Path((id, group_name)): Path<(String, String)>,
    Json(request): Json<SaveRecipeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe_id = parse_object_id(&request.recipe_id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .add_to_group(id, recipe_id, &group_name)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

pub async fn remove_from_group(
    State(state): State<UsersApiState>,
    Path((id, group_name, recipe_id)): Path<(String, String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe_id = parse_object_id(&recipe_id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .remove_from_group(id, recipe_id, &group_name)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

pub async fn delete_group(
    State(state): State<UsersApiState>,
    Path((id, group_name)): Path<(String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .delete_group(id, &group_name)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

pub async fn rename_group(
    State(state): State<UsersApiState>,
    Path((id, group_name)): Path<(String, String)>,
    Json(request): Json<RenameGroupRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .rename_group(id, &group_name, &request.new_name)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

pub async fn follow(
    State(state): State<UsersApiState>,
    Path(id): Path<String>,
    Json(request): Json<FollowRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let target_id = parse_object_id(&request.user_id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .follow(id, target_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

pub async fn unfollow(
    State(state): State<UsersApiState>,
    Path((id, target_id)): Path<(String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let target_id = parse_object_id(&target_id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .unfollow(id, target_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}

/// Toggle the "I made this" flag for a recipe
pub async fn set_made(
    State(state): State<UsersApiState>,
    Path((id, recipe_id)): Path<(String, String)>,
    Json(request): Json<MadeRecipeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_object_id(&id).map_err(ApiError::from_data)?;
    let recipe_id = parse_object_id(&recipe_id).map_err(ApiError::from_data)?;
    let user = state
        .users
        .set_made(id, recipe_id, request.made)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(user_not_found)?;
    Ok(Json(user.into()))
}
