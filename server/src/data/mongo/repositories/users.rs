//! User collection operations

use bson::{Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::options::ReturnDocument;

use crate::data::error::DataError;
use crate::data::mongo::models::{RecipeGroup, UserDoc};
use crate::data::mongo::query::QueryBuilder;

// Array field names on the user document
pub const FIELD_OWNED_RECIPES: &str = "ownedRecipes";
pub const FIELD_SAVED_RECIPES: &str = "savedRecipes";
pub const FIELD_FOLLOWERS: &str = "followers";
pub const FIELD_FOLLOWING: &str = "following";
pub const FIELD_MADE_RECIPES: &str = "madeRecipes";

pub async fn find_by_id(
    users: &Collection<UserDoc>,
    id: ObjectId,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users.find_one(doc! { "_id": id }).await?)
}

pub async fn find_by_username(
    users: &Collection<UserDoc>,
    username: &str,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users.find_one(doc! { "username": username }).await?)
}

pub async fn find_by_google_id(
    users: &Collection<UserDoc>,
    google_id: &str,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users.find_one(doc! { "googleId": google_id }).await?)
}

pub async fn find_by_facebook_id(
    users: &Collection<UserDoc>,
    facebook_id: &str,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users.find_one(doc! { "facebookId": facebook_id }).await?)
}

/// Fetch a page of users by id
pub async fn find_by_ids(
    users: &Collection<UserDoc>,
    ids: &[ObjectId],
    offset: u64,
    limit: i64,
) -> Result<Vec<UserDoc>, DataError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new();
    builder.where_id_in(ids);
    let cursor = users
        .find(builder.into_filter())
        .skip(offset)
        .limit(limit)
        .await?;
    Ok(cursor.try_collect().await?)
}

/// Insert a user and return it with its assigned id
pub async fn insert(
    users: &Collection<UserDoc>,
    mut user: UserDoc,
) -> Result<UserDoc, DataError> {
    let result = users.insert_one(&user).await?;
    user.id = result.inserted_id.as_object_id();
    Ok(user)
}

/// Apply field updates and return the post-update document
pub async fn update_set(
    users: &Collection<UserDoc>,
    id: ObjectId,
    changes: Document,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users
        .find_one_and_update(doc! { "_id": id }, doc! { "$set": changes })
        .return_document(ReturnDocument::After)
        .await?)
}

pub async fn delete(users: &Collection<UserDoc>, id: ObjectId) -> Result<bool, DataError> {
    let result = users.delete_one(doc! { "_id": id }).await?;
    Ok(result.deleted_count > 0)
}

/// Add an id to one of the user's id arrays, without duplicates
pub async fn add_to_array(
    users: &Collection<UserDoc>,
    id: ObjectId,
    field: &str,
    value: ObjectId,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users
        .find_one_and_update(doc! { "_id": id }, doc! { "$addToSet": { field: value } })
        .return_document(ReturnDocument::After)
        .await?)
}

/// Remove an id from one of the user's id arrays
pub async fn pull_from_array(
    users: &Collection<UserDoc>,
    id: ObjectId,
    field: &str,
    value: ObjectId,
) -> Result<Option<UserDoc>, DataError> {
    Ok(users
        .find_one_and_update(doc! { "_id": id }, doc! { "$pull": { field: value } })
        .return_document(ReturnDocument::After)
        .await?)
}

/// Replace the user's recipe groups wholesale
pub async fn set_recipe_groups(
    users: &Collection<UserDoc>,
    id: ObjectId,
    groups: &[RecipeGroup],
) -> Result<Option<UserDoc>, DataError> {
    let groups = bson::to_bson(groups)?;
    update_set(users, id, doc! { "recipeGroups": groups }).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_groups_serialize_with_wire_field_names() {
        let groups = vec![RecipeGroup {
            name: "weeknight".to_string(),
            recipes: vec![ObjectId::new()],
        }];
        let bson = bson::to_bson(&groups).unwrap();
        let arr = bson.as_array().unwrap();
        let group = arr[0].as_document().unwrap();
        assert_eq!(group.get_str("name").unwrap(), "weeknight");
        assert_eq!(group.get_array("recipes").unwrap().len(), 1);
    }
}
