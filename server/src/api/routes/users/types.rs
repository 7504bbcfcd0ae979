//! Request and response types for the users API
//!
//! Responses use the camelCase wire format existing clients expect.
//! Credentials (password digest, salt) never appear in responses.

use serde::{Deserialize, Serialize};

use crate::api::types::PageParams;
use crate::data::mongo::models::{RecipeGroup, UserDoc};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeGroupResponse {
    pub name: String,
    pub recipes: Vec<String>,
}

impl From<RecipeGroup> for RecipeGroupResponse {
    fn from(group: RecipeGroup) -> Self {
        Self {
            name: group.name,
            recipes: group.recipes.iter().map(|id| id.to_hex()).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub owned_recipes: Vec<String>,
    pub saved_recipes: Vec<String>,
    pub recipe_groups: Vec<RecipeGroupResponse>,
    pub google_id: String,
    pub facebook_id: String,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub profile_picture: String,
    pub made_recipes: Vec<String>,
}

impl From<UserDoc> for UserResponse {
    fn from(user: UserDoc) -> Self {
        let hex = |ids: Vec<bson::oid::ObjectId>| -> Vec<String> {
            ids.iter().map(|id| id.to_hex()).collect()
        };
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
            owned_recipes: hex(user.owned_recipes),
            saved_recipes: hex(user.saved_recipes),
            recipe_groups: user.recipe_groups.into_iter().map(Into::into).collect(),
            google_id: user.google_id,
            facebook_id: user.facebook_id,
            followers: hex(user.followers),
            following: hex(user.following),
            profile_picture: user.profile_picture,
            made_recipes: hex(user.made_recipes),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_picture_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupUsersRequest {
    pub ids: Vec<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// Query-string parameters for the recipe-group listing
#[derive(Debug, Default, Deserialize)]
pub struct GroupListParams {
    /// Case-insensitive substring match on group names
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecipeRequest {
    pub recipe_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameGroupRequest {
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MadeRecipeRequest {
    pub made: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn test_user_response_hides_credentials() {
        let mut user = UserDoc::with_username("ada");
        user.id = Some(ObjectId::new());
        user.password = "digest".to_string();
        user.salt = "salt".to_string();

        let response: UserResponse = user.into();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("salt").is_none());
        assert_eq!(json["username"], "ada");
    }

    #[test]
    fn test_user_response_wire_field_names() {
        let mut user = UserDoc::with_username("grace");
        user.id = Some(ObjectId::new());
        user.is_admin = true;
        user.recipe_groups = vec![RecipeGroup {
            name: "soups".to_string(),
            recipes: vec![ObjectId::new()],
        }];

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["isAdmin"], true);
        assert!(json["recipeGroups"][0]["recipes"][0].is_string());
        assert!(json.get("is_admin").is_none());
    }
}
