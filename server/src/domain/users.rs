//! User account and recipe box logic
//!
//! Saved recipes are private copies: saving makes an unpublished duplicate
//! of the source recipe owned by the saver, so later edits or deletion of
//! the source recipe never reach into anyone's recipe box.

use bson::{Document, oid::ObjectId};
use mongodb::Collection;

use crate::api::auth::password::{generate_salt, hash_password, verify_password};
use crate::data::DataError;
use crate::data::media::{BucketKind, MediaStore};
use crate::data::mongo::filters::Filter;
use crate::data::mongo::models::{RecipeDoc, RecipeGroup, UserDoc};
use crate::data::mongo::repositories::recipes as recipe_repo;
use crate::data::mongo::repositories::users as user_repo;
use crate::data::mongo::repositories::users::{
    FIELD_FOLLOWERS, FIELD_FOLLOWING, FIELD_MADE_RECIPES, FIELD_SAVED_RECIPES,
};

/// Social identity providers accepted at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl SocialProvider {
    /// Parse the wire-format provider token; `None` for unrecognized tokens
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GOOGLE" => Some(Self::Google),
            "FACEBOOK" => Some(Self::Facebook),
            _ => None,
        }
    }
}

/// In-band login failure, reported in the response envelope rather than as
/// an HTTP error so clients can branch on the code
#[derive(Debug, Clone, Copy)]
pub struct LoginFailure {
    pub code: &'static str,
    pub message: &'static str,
}

/// Outcome of a login or registration attempt
pub enum LoginOutcome {
    Success(Box<UserDoc>),
    Failure(LoginFailure),
}

impl LoginOutcome {
    fn failure(code: &'static str, message: &'static str) -> Self {
        Self::Failure(LoginFailure { code, message })
    }
}

/// Field updates for a user profile
#[derive(Debug, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Plaintext; re-salted and hashed before storage
    pub password: Option<String>,
    /// External URI to fetch and store as the new profile picture
    pub profile_picture_uri: Option<String>,
}

/// User account operations over explicit collection handles
pub struct UserService {
    users: Collection<UserDoc>,
    recipes: Collection<RecipeDoc>,
    media: Option<MediaStore>,
}

impl UserService {
    pub fn new(
        users: Collection<UserDoc>,
        recipes: Collection<RecipeDoc>,
        media: Option<MediaStore>,
    ) -> Self {
        Self {
            users,
            recipes,
            media,
        }
    }

    // ---- Login and registration ----

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DataError> {
        let Some(user) = user_repo::find_by_username(&self.users, username).await? else {
            return Ok(LoginOutcome::failure(
                "USER_NOT_FOUND",
                "A User with that username does not exist.",
            ));
        };
        if !verify_password(password, &user.salt, &user.password) {
            return Ok(LoginOutcome::failure(
                "INCORRECT_PASSWORD",
                "Incorrect Password.",
            ));
        }
        Ok(LoginOutcome::Success(Box::new(user)))
    }

    pub async fn login_social(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<LoginOutcome, DataError> {
        let (user, message) = match provider {
            SocialProvider::Google => (
                user_repo::find_by_google_id(&self.users, social_id).await?,
                "A User with that googleId does not exist.",
            ),
            SocialProvider::Facebook => (
                user_repo::find_by_facebook_id(&self.users, social_id).await?,
                "A User with that facebookId does not exist.",
            ),
        };
        match user {
            Some(user) => Ok(LoginOutcome::Success(Box::new(user))),
            None => Ok(LoginOutcome::failure("USER_NOT_FOUND", message)),
        }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        profile_picture_uri: Option<&str>,
    ) -> Result<LoginOutcome, DataError> {
        if user_repo::find_by_username(&self.users, username)
            .await?
            .is_some()
        {
            return Ok(LoginOutcome::failure(
                "DUPLICATE_USERNAME",
                "That username already exists.",
            ));
        }

        let salt = generate_salt();
        let mut user = UserDoc::with_username(username);
        user.password = hash_password(password, &salt);
        user.salt = salt;

        if let (Some(media), Some(uri)) = (&self.media, profile_picture_uri) {
            user.profile_picture = media
                .store_photo_from_uri(BucketKind::User, uri, username)
                .await?;
        }

        let user = user_repo::insert(&self.users, user).await?;
        tracing::info!(username, "User registered");
        Ok(LoginOutcome::Success(Box::new(user)))
    }

    pub async fn register_social(
        &self,
        provider: SocialProvider,
        social_id: &str,
        username: &str,
    ) -> Result<LoginOutcome, DataError> {
        if user_repo::find_by_username(&self.users, username)
            .await?
            .is_some()
        {
            return Ok(LoginOutcome::failure(
                "DUPLICATE_USERNAME",
                "Username already exists.",
            ));
        }

        let mut user = UserDoc::with_username(username);
        match provider {
            SocialProvider::Google => {
                if user_repo::find_by_google_id(&self.users, social_id)
                    .await?
                    .is_some()
                {
                    return Ok(LoginOutcome::failure(
                        "DUPLICATE_GOOGLEID",
                        "A User with that googleId already exists.",
                    ));
                }
                user.google_id = social_id.to_string();
            }
            SocialProvider::Facebook => {
                if user_repo::find_by_facebook_id(&self.users, social_id)
                    .await?
                    .is_some()
                {
                    return Ok(LoginOutcome::failure(
                        "DUPLICATE_FACEBOOKID",
                        "A User with that facebookId already exists.",
                    ));
                }
                user.facebook_id = social_id.to_string();
            }
        }

        let user = user_repo::insert(&self.users, user).await?;
        tracing::info!(username, ?provider, "User registered via social login");
        Ok(LoginOutcome::Success(Box::new(user)))
    }

    // ---- Profile ----

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<UserDoc>, DataError> {
        user_repo::find_by_id(&self.users, id).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserDoc>, DataError> {
        user_repo::find_by_username(&self.users, username).await
    }

    pub async fn find_many(
        &self,
        ids: &[ObjectId],
        offset: u64,
        limit: i64,
    ) -> Result<Vec<UserDoc>, DataError> {
        user_repo::find_by_ids(&self.users, ids, offset, limit).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        updates: UserUpdate,
    ) -> Result<Option<UserDoc>, DataError> {
        let Some(current) = user_repo::find_by_id(&self.users, id).await? else {
            return Ok(None);
        };

        let mut changes = Document::new();
        if let Some(username) = updates.username {
            changes.insert("username", username);
        }
        if let Some(email) = updates.email {
            changes.insert("email", email);
        }
        if let Some(password) = updates.password {
            let salt = generate_salt();
            changes.insert("password", hash_password(&password, &salt));
            changes.insert("salt", salt);
        }
        if let (Some(media), Some(uri)) = (&self.media, updates.profile_picture_uri) {
            if !current.profile_picture.is_empty() {
                media
                    .remove_image(BucketKind::User, &current.profile_picture)
                    .await?;
            }
            let url = media
                .store_photo_from_uri(BucketKind::User, &uri, &current.username)
                .await?;
            changes.insert("profilePicture", url);
        }

        if changes.is_empty() {
            return Ok(Some(current));
        }
        user_repo::update_set(&self.users, id, changes).await
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, DataError> {
        user_repo::delete(&self.users, id).await
    }

    // ---- Saved recipes ----

    /// Save a private copy of a recipe into the user's recipe box
    pub async fn save_recipe(
        &self,
        user_id: ObjectId,
        recipe_id: ObjectId,
    ) -> Result<Option<RecipeDoc>, DataError> {
        let Some(mut copy) = self.copy_of_recipe(recipe_id).await? else {
            return Ok(None);
        };
        copy.published = false;
        let copy = recipe_repo::insert(&self.recipes, copy).await?;
        if let Some(copy_id) = copy.id {
            user_repo::add_to_array(&self.users, user_id, FIELD_SAVED_RECIPES, copy_id).await?;
        }
        Ok(Some(copy))
    }

    /// Remove a saved copy from the recipe box and delete the copy itself
    pub async fn delete_saved_recipe(
        &self,
        user_id: ObjectId,
        recipe_id: ObjectId,
    ) -> Result<bool, DataError> {
        recipe_repo::delete(&self.recipes, recipe_id).await?;
        let user =
            user_repo::pull_from_array(&self.users, user_id, FIELD_SAVED_RECIPES, recipe_id)
                .await?;
        Ok(user.is_some())
    }

    pub async fn search_saved(
        &self,
        user_id: ObjectId,
        phrase: &str,
        filters: &[Filter],
        limit: i64,
        offset: u64,
    ) -> Result<Option<Vec<RecipeDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        self.search_scoped(&user.saved_recipes, phrase, filters, limit, offset)
            .await
            .map(Some)
    }

    pub async fn search_owned(
        &self,
        user_id: ObjectId,
        phrase: &str,
        filters: &[Filter],
        limit: i64,
        offset: u64,
    ) -> Result<Option<Vec<RecipeDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        self.search_scoped(&user.owned_recipes, phrase, filters, limit, offset)
            .await
            .map(Some)
    }

    async fn search_scoped(
        &self,
        scope: &[ObjectId],
        phrase: &str,
        filters: &[Filter],
        limit: i64,
        offset: u64,
    ) -> Result<Vec<RecipeDoc>, DataError> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }
        recipe_repo::search(
            &self.recipes,
            recipe_repo::RecipeSearch {
                phrase,
                filters,
                scope_ids: Some(scope),
                published_only: false,
                limit,
                offset,
            },
        )
        .await
    }

    // ---- Listing ----

    /// Page through the recipes the user authored, in no particular order
    pub async fn list_owned(
        &self,
        user_id: ObjectId,
        offset: u64,
        limit: i64,
    ) -> Result<Option<Vec<RecipeDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        recipe_repo::find_by_ids(&self.recipes, &user.owned_recipes, offset, limit)
            .await
            .map(Some)
    }

    /// Page through the user's saved recipe copies
    pub async fn list_saved(
        &self,
        user_id: ObjectId,
        offset: u64,
        limit: i64,
    ) -> Result<Option<Vec<RecipeDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        recipe_repo::find_by_ids(&self.recipes, &user.saved_recipes, offset, limit)
            .await
            .map(Some)
    }

    /// Page through the recipes the user marked as made
    pub async fn list_made(
        &self,
        user_id: ObjectId,
        offset: u64,
        limit: i64,
    ) -> Result<Option<Vec<RecipeDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        recipe_repo::find_by_ids(&self.recipes, &user.made_recipes, offset, limit)
            .await
            .map(Some)
    }

    pub async fn list_followers(
        &self,
        user_id: ObjectId,
        offset: u64,
        limit: i64,
    ) -> Result<Option<Vec<UserDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        user_repo::find_by_ids(&self.users, &user.followers, offset, limit)
            .await
            .map(Some)
    }

    pub async fn list_following(
        &self,
        user_id: ObjectId,
        offset: u64,
        limit: i64,
    ) -> Result<Option<Vec<UserDoc>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        user_repo::find_by_ids(&self.users, &user.following, offset, limit)
            .await
            .map(Some)
    }

    /// Page through the user's recipe groups, optionally narrowed to names
    /// containing `name` (case-insensitive)
    pub async fn list_groups(
        &self,
        user_id: ObjectId,
        name: Option<&str>,
        offset: u64,
        limit: i64,
    ) -> Result<Option<Vec<RecipeGroup>>, DataError> {
        let Some(user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        let needle = name.map(str::to_lowercase);
        let groups = user
            .recipe_groups
            .into_iter()
            .filter(|g| {
                needle
                    .as_ref()
                    .is_none_or(|n| g.name.to_lowercase().contains(n))
            })
            .skip(offset as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok(Some(groups))
    }

    // ---- Recipe groups ----

    /// Save a copy of a recipe into a named group, creating the group on
    /// first use
    pub async fn add_to_group(
        &self,
        user_id: ObjectId,
        recipe_id: ObjectId,
        group_name: &str,
    ) -> Result<Option<UserDoc>, DataError> {
        let Some(mut user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        let Some(mut copy) = self.copy_of_recipe(recipe_id).await? else {
            return Ok(Some(user));
        };
        copy.published = false;
        let copy = recipe_repo::insert(&self.recipes, copy).await?;
        let Some(copy_id) = copy.id else {
            return Ok(Some(user));
        };

        match user.recipe_groups.iter_mut().find(|g| g.name == group_name) {
            Some(group) => group.recipes.push(copy_id),
            None => user.recipe_groups.push(RecipeGroup {
                name: group_name.to_string(),
                recipes: vec![copy_id],
            }),
        }
        user_repo::set_recipe_groups(&self.users, user_id, &user.recipe_groups).await
    }

    /// Remove a recipe from a group and delete the stored copy
    ///
    /// A missing group or a recipe not in the group leaves the user
    /// untouched.
    pub async fn remove_from_group(
        &self,
        user_id: ObjectId,
        recipe_id: ObjectId,
        group_name: &str,
    ) -> Result<Option<UserDoc>, DataError> {
        let Some(mut user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        let Some(group) = user.recipe_groups.iter_mut().find(|g| g.name == group_name) else {
            return Ok(Some(user));
        };
        let Some(position) = group.recipes.iter().position(|id| *id == recipe_id) else {
            return Ok(Some(user));
        };
        group.recipes.remove(position);
        recipe_repo::delete(&self.recipes, recipe_id).await?;
        user_repo::set_recipe_groups(&self.users, user_id, &user.recipe_groups).await
    }

    /// Delete a group and every stored copy it contains
    pub async fn delete_group(
        &self,
        user_id: ObjectId,
        group_name: &str,
    ) -> Result<Option<UserDoc>, DataError> {
        let Some(mut user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        let Some(position) = user
            .recipe_groups
            .iter()
            .position(|g| g.name == group_name)
        else {
            return Ok(Some(user));
        };
        let group = user.recipe_groups.remove(position);
        recipe_repo::delete_many(&self.recipes, &group.recipes).await?;
        user_repo::set_recipe_groups(&self.users, user_id, &user.recipe_groups).await
    }

    pub async fn rename_group(
        &self,
        user_id: ObjectId,
        old_name: &str,
        new_name: &str,
    ) -> Result<Option<UserDoc>, DataError> {
        let Some(mut user) = user_repo::find_by_id(&self.users, user_id).await? else {
            return Ok(None);
        };
        let Some(group) = user.recipe_groups.iter_mut().find(|g| g.name == old_name) else {
            return Ok(Some(user));
        };
        group.name = new_name.to_string();
        user_repo::set_recipe_groups(&self.users, user_id, &user.recipe_groups).await
    }

    // ---- Follow graph ----

    /// Follow another user; both sides of the edge are recorded
    pub async fn follow(
        &self,
        user_id: ObjectId,
        target_id: ObjectId,
    ) -> Result<Option<UserDoc>, DataError> {
        user_repo::add_to_array(&self.users, target_id, FIELD_FOLLOWERS, user_id).await?;
        user_repo::add_to_array(&self.users, user_id, FIELD_FOLLOWING, target_id).await
    }

    pub async fn unfollow(
        &self,
        user_id: ObjectId,
        target_id: ObjectId,
    ) -> Result<Option<UserDoc>, DataError> {
        user_repo::pull_from_array(&self.users, target_id, FIELD_FOLLOWERS, user_id).await?;
        user_repo::pull_from_array(&self.users, user_id, FIELD_FOLLOWING, target_id).await
    }

    // ---- Made-it flag ----

    pub async fn set_made(
        &self,
        user_id: ObjectId,
        recipe_id: ObjectId,
        made: bool,
    ) -> Result<Option<UserDoc>, DataError> {
        if made {
            user_repo::add_to_array(&self.users, user_id, FIELD_MADE_RECIPES, recipe_id).await
        } else {
            user_repo::pull_from_array(&self.users, user_id, FIELD_MADE_RECIPES, recipe_id).await
        }
    }

    /// Load a recipe as a fresh unsaved document, ready for re-insertion
    async fn copy_of_recipe(&self, recipe_id: ObjectId) -> Result<Option<RecipeDoc>, DataError> {
        let Some(mut recipe) = recipe_repo::find_by_id(&self.recipes, recipe_id).await? else {
            return Ok(None);
        };
        recipe.id = None;
        Ok(Some(recipe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_provider_parse() {
        assert_eq!(SocialProvider::parse("GOOGLE"), Some(SocialProvider::Google));
        assert_eq!(
            SocialProvider::parse("FACEBOOK"),
            Some(SocialProvider::Facebook)
        );
        assert_eq!(SocialProvider::parse("TWITTER"), None);
        assert_eq!(SocialProvider::parse("google"), None);
    }

    #[test]
    fn test_login_outcome_failure_carries_code() {
        let LoginOutcome::Failure(failure) =
            LoginOutcome::failure("USER_NOT_FOUND", "A User with that username does not exist.")
        else {
            panic!("expected failure");
        };
        assert_eq!(failure.code, "USER_NOT_FOUND");
    }
}
