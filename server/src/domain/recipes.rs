//! Recipe catalogue logic

use bson::{Document, oid::ObjectId};
use chrono::Utc;
use mongodb::Collection;

use crate::data::DataError;
use crate::data::media::{BucketKind, MediaStore};
use crate::data::mongo::filters::Filter;
use crate::data::mongo::models::{RecipeDoc, UserDoc};
use crate::data::mongo::repositories::recipes as recipe_repo;
use crate::data::mongo::repositories::users as user_repo;
use crate::data::mongo::repositories::users::FIELD_OWNED_RECIPES;

/// Input for creating a recipe
pub struct NewRecipe {
    pub description: String,
    pub system: String,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub source_url: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: i64,
    pub servings: i64,
    pub notes: Vec<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub author: ObjectId,
    /// External URIs imported into the photo bucket
    pub image_uris: Vec<String>,
}

/// Input for the scraped-recipe import
pub struct ScrapedRecipe {
    pub description: String,
    pub system: String,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub source_url: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: i64,
    pub servings: i64,
    pub notes: Vec<String>,
    pub tags: Vec<String>,
    pub author: ObjectId,
    /// Photo on the scraped site, copied into our bucket
    pub image_uri: String,
}

/// Result of a scraped-recipe import
pub enum ScrapedImportResult {
    /// The author already has a recipe with this name
    Duplicate,
    /// Imported; carries the recipe name
    Saved(String),
}

impl ScrapedImportResult {
    /// Human-readable status line reported back to the scraper
    pub fn message(&self) -> String {
        match self {
            Self::Duplicate => "Duplicate Recipe".to_string(),
            Self::Saved(name) => format!("{} Saved", name),
        }
    }
}

/// Field updates for a recipe
#[derive(Debug, Default)]
pub struct RecipeUpdate {
    pub description: Option<String>,
    pub system: Option<String>,
    pub name: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub source_url: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub difficulty: Option<i64>,
    pub servings: Option<i64>,
    pub notes: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    /// External URIs imported and appended to the photo list
    pub images_to_add: Vec<String>,
    /// Public URLs removed from the photo list and deleted from storage
    pub images_to_remove: Vec<String>,
}

/// Recipe catalogue operations over explicit collection handles
pub struct RecipeService {
    recipes: Collection<RecipeDoc>,
    users: Collection<UserDoc>,
    media: Option<MediaStore>,
}

impl RecipeService {
    pub fn new(
        recipes: Collection<RecipeDoc>,
        users: Collection<UserDoc>,
        media: Option<MediaStore>,
    ) -> Self {
        Self {
            recipes,
            users,
            media,
        }
    }

    /// Full-text search over published recipes, best match first
    pub async fn search_public(
        &self,
        phrase: &str,
        filters: &[Filter],
        limit: i64,
        offset: u64,
    ) -> Result<Vec<RecipeDoc>, DataError> {
        recipe_repo::search(
            &self.recipes,
            recipe_repo::RecipeSearch {
                phrase,
                filters,
                scope_ids: None,
                published_only: true,
                limit,
                offset,
            },
        )
        .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<RecipeDoc>, DataError> {
        recipe_repo::find_by_id(&self.recipes, id).await
    }

    pub async fn find_many(
        &self,
        ids: &[ObjectId],
        offset: u64,
        limit: i64,
    ) -> Result<Vec<RecipeDoc>, DataError> {
        recipe_repo::find_by_ids(&self.recipes, ids, offset, limit).await
    }

    pub async fn create(&self, input: NewRecipe) -> Result<RecipeDoc, DataError> {
        let images = self.import_images(&input.name, input.image_uris).await?;
        let recipe = RecipeDoc {
            id: None,
            created: Utc::now(),
            description: input.description,
            system: input.system,
            images,
            name: input.name,
            ingredients: input.ingredients,
            instructions: input.instructions,
            source_url: input.source_url,
            prep_time: input.prep_time,
            cook_time: input.cook_time,
            difficulty: input.difficulty,
            servings: input.servings,
            rating: 0.0,
            author: input.author,
            notes: input.notes,
            num_reviews: 0,
            num_shares: 0,
            tags: input.tags,
            comments: Vec::new(),
            published: input.published,
        };
        let recipe = recipe_repo::insert(&self.recipes, recipe).await?;
        if let Some(id) = recipe.id {
            user_repo::add_to_array(&self.users, recipe.author, FIELD_OWNED_RECIPES, id).await?;
        }
        tracing::debug!(name = %recipe.name, "Recipe created");
        Ok(recipe)
    }

    /// Import a recipe scraped from an external site
    ///
    /// Scraped recipes are published immediately; a second import of the
    /// same name by the same author is reported as a duplicate, not saved
    /// twice.
    pub async fn import_scraped(
        &self,
        input: ScrapedRecipe,
    ) -> Result<ScrapedImportResult, DataError> {
        if recipe_repo::exists_by_name_and_author(&self.recipes, &input.name, input.author)
            .await?
        {
            return Ok(ScrapedImportResult::Duplicate);
        }

        let images = self
            .import_images(&input.name, vec![input.image_uri])
            .await?;
        let recipe = RecipeDoc {
            id: None,
            created: Utc::now(),
            description: input.description,
            system: input.system,
            images,
            name: input.name,
            ingredients: input.ingredients,
            instructions: input.instructions,
            source_url: input.source_url,
            prep_time: input.prep_time,
            cook_time: input.cook_time,
            difficulty: input.difficulty,
            servings: input.servings,
            rating: 0.0,
            author: input.author,
            notes: input.notes,
            num_reviews: 0,
            num_shares: 0,
            tags: input.tags,
            comments: Vec::new(),
            published: true,
        };
        let recipe = recipe_repo::insert(&self.recipes, recipe).await?;
        if let Some(id) = recipe.id {
            user_repo::add_to_array(&self.users, recipe.author, FIELD_OWNED_RECIPES, id).await?;
        }
        tracing::info!(name = %recipe.name, "Scraped recipe imported");
        Ok(ScrapedImportResult::Saved(recipe.name))
    }

    pub async fn update(
        &self,
        id: ObjectId,
        update: RecipeUpdate,
    ) -> Result<Option<RecipeDoc>, DataError> {
        let Some(current) = recipe_repo::find_by_id(&self.recipes, id).await? else {
            return Ok(None);
        };

        let mut changes = scalar_changes(&update);

        if !update.images_to_add.is_empty() || !update.images_to_remove.is_empty() {
            let mut images = current.images.clone();
            if !update.images_to_remove.is_empty() {
                if let Some(media) = &self.media {
                    media
                        .remove_images(BucketKind::Recipe, &update.images_to_remove)
                        .await?;
                }
                images.retain(|url| !update.images_to_remove.contains(url));
            }
            let name = update.name.as_deref().unwrap_or(&current.name);
            let added = self
                .import_images(name, update.images_to_add)
                .await?;
            images.extend(added);
            changes.insert("images", images);
        }

        if changes.is_empty() {
            return Ok(Some(current));
        }
        recipe_repo::update_set(&self.recipes, id, changes).await
    }

    /// Delete a recipe and drop it from its author's owned list
    pub async fn delete(&self, id: ObjectId) -> Result<bool, DataError> {
        let Some(removed) = recipe_repo::delete(&self.recipes, id).await? else {
            return Ok(false);
        };
        user_repo::pull_from_array(&self.users, removed.author, FIELD_OWNED_RECIPES, id).await?;
        tracing::debug!(name = %removed.name, "Recipe deleted");
        Ok(true)
    }

    /// Store directly uploaded photo files and append them to a recipe
    ///
    /// Each photo is `(filename, content type, bytes)`. Unlike URI imports
    /// this path has no fallback: without configured media storage there is
    /// nowhere to put the bytes.
    pub async fn add_photos(
        &self,
        id: ObjectId,
        photos: Vec<(String, Option<String>, Vec<u8>)>,
    ) -> Result<Option<RecipeDoc>, DataError> {
        let Some(media) = &self.media else {
            return Err(DataError::storage("Photo storage is not configured"));
        };
        let Some(current) = recipe_repo::find_by_id(&self.recipes, id).await? else {
            return Ok(None);
        };
        let mut images = current.images;
        images.extend(media.upload_photos(BucketKind::Recipe, photos).await?);
        let mut changes = Document::new();
        changes.insert("images", images);
        recipe_repo::update_set(&self.recipes, id, changes).await
    }

    /// Copy external photo URIs into the recipe bucket
    ///
    /// Without configured media storage the URIs are kept as-is, so a
    /// development server without buckets still produces usable records.
    async fn import_images(
        &self,
        recipe_name: &str,
        uris: Vec<String>,
    ) -> Result<Vec<String>, DataError> {
        let Some(media) = &self.media else {
            return Ok(uris);
        };
        let mut urls = Vec::with_capacity(uris.len());
        for uri in &uris {
            urls.push(
                media
                    .store_photo_from_uri(BucketKind::Recipe, uri, recipe_name)
                    .await?,
            );
        }
        Ok(urls)
    }
}

fn scalar_changes(update: &RecipeUpdate) -> Document {
    let mut changes = Document::new();
    if let Some(v) = &update.description {
        changes.insert("description", v.as_str());
    }
    if let Some(v) = &update.system {
        changes.insert("system", v.as_str());
    }
    if let Some(v) = &update.name {
        changes.insert("name", v.as_str());
    }
    if let Some(v) = &update.ingredients {
        changes.insert("ingredients", v.clone());
    }
    if let Some(v) = &update.instructions {
        changes.insert("instructions", v.clone());
    }
    if let Some(v) = &update.source_url {
        changes.insert("sourceURL", v.as_str());
    }
    if let Some(v) = update.prep_time {
        changes.insert("prepTime", v);
    }
    if let Some(v) = update.cook_time {
        changes.insert("cookTime", v);
    }
    if let Some(v) = update.difficulty {
        changes.insert("difficulty", v);
    }
    if let Some(v) = update.servings {
        changes.insert("servings", v);
    }
    if let Some(v) = &update.notes {
        changes.insert("notes", v.clone());
    }
    if let Some(v) = &update.tags {
        changes.insert("tags", v.clone());
    }
    if let Some(v) = update.published {
        changes.insert("published", v);
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraped_import_messages() {
        assert_eq!(ScrapedImportResult::Duplicate.message(), "Duplicate Recipe");
        assert_eq!(
            ScrapedImportResult::Saved("Pho".to_string()).message(),
            "Pho Saved"
        );
    }

    #[test]
    fn test_scalar_changes_maps_wire_field_names() {
        let update = RecipeUpdate {
            source_url: Some("https://example.com".to_string()),
            prep_time: Some(10),
            published: Some(true),
            ..Default::default()
        };
        let changes = scalar_changes(&update);
        assert_eq!(changes.get_str("sourceURL").unwrap(), "https://example.com");
        assert_eq!(changes.get_i64("prepTime").unwrap(), 10);
        assert!(changes.get_bool("published").unwrap());
        assert!(!changes.contains_key("name"));
    }

    #[test]
    fn test_scalar_changes_empty_for_default_update() {
        assert!(scalar_changes(&RecipeUpdate::default()).is_empty());
    }
}
