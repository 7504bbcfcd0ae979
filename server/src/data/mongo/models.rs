//! Stored document shapes for the users and recipes collections
//!
//! Field names match the historical wire format of the collections
//! (camelCase, with `sourceURL` as a legacy spelling), so existing data
//! round-trips unchanged.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_system() -> String {
    "us".to_string()
}

fn default_now() -> DateTime<Utc> {
    Utc::now()
}

/// A recipe document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime",
        default = "default_now"
    )]
    pub created: DateTime<Utc>,
    pub description: String,
    /// Measurement system for ingredient quantities ("us" or "metric")
    #[serde(default = "default_system")]
    pub system: String,
    /// Public URLs of uploaded photos
    #[serde(default)]
    pub images: Vec<String>,
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
    pub rating: f64,
    pub author: ObjectId,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub num_reviews: i64,
    #[serde(default)]
    pub num_shares: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    /// Only published recipes appear in the public search
    #[serde(default)]
    pub published: bool,
}

/// A named collection of privately saved recipe copies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeGroup {
    pub name: String,
    pub recipes: Vec<ObjectId>,
}

/// A user document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// SHA-512 hex digest of password + salt; empty for social-login users
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub salt: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub owned_recipes: Vec<ObjectId>,
    #[serde(default)]
    pub saved_recipes: Vec<ObjectId>,
    #[serde(default)]
    pub recipe_groups: Vec<RecipeGroup>,
    #[serde(default)]
    pub google_id: String,
    #[serde(default)]
    pub facebook_id: String,
    #[serde(default)]
    pub followers: Vec<ObjectId>,
    #[serde(default)]
    pub following: Vec<ObjectId>,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub made_recipes: Vec<ObjectId>,
}

impl UserDoc {
    /// A bare user record with everything defaulted except the username
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: String::new(),
            password: String::new(),
            salt: String::new(),
            is_admin: false,
            owned_recipes: Vec::new(),
            saved_recipes: Vec::new(),
            recipe_groups: Vec::new(),
            google_id: String::new(),
            facebook_id: String::new(),
            followers: Vec::new(),
            following: Vec::new(),
            profile_picture: String::new(),
            made_recipes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_recipe_doc_field_names() {
        let recipe = RecipeDoc {
            id: None,
            created: Utc::now(),
            description: "A test".into(),
            system: "us".into(),
            images: vec![],
            name: "Toast".into(),
            ingredients: vec!["bread".into()],
            instructions: vec!["toast it".into()],
            source_url: "https://example.com".into(),
            prep_time: 1,
            cook_time: 2,
            difficulty: 1,
            servings: 1,
            rating: 0.0,
            author: ObjectId::new(),
            notes: vec![],
            num_reviews: 0,
            num_shares: 0,
            tags: vec![],
            comments: vec![],
            published: false,
        };
        let doc = bson::to_document(&recipe).unwrap();
        assert!(doc.contains_key("sourceURL"));
        assert!(doc.contains_key("prepTime"));
        assert!(doc.contains_key("cookTime"));
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn test_user_doc_defaults_on_sparse_document() {
        // Social-login users were created with only these fields set.
        let doc = doc! {
            "_id": ObjectId::new(),
            "username": "ada",
            "googleId": "g-123",
        };
        let user: UserDoc = bson::from_document(doc).unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.google_id, "g-123");
        assert!(user.password.is_empty());
        assert!(!user.is_admin);
        assert!(user.saved_recipes.is_empty());
        assert!(user.recipe_groups.is_empty());
    }

    #[test]
    fn test_with_username() {
        let user = UserDoc::with_username("grace");
        assert_eq!(user.username, "grace");
        assert!(user.id.is_none());
        assert!(user.following.is_empty());
    }
}
