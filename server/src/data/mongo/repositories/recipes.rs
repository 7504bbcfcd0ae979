//! Recipe collection operations

use bson::{Bson, Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::Collection;
use mongodb::options::ReturnDocument;

use crate::data::error::DataError;
use crate::data::mongo::filters::{Filter, apply_filters};
use crate::data::mongo::models::RecipeDoc;
use crate::data::mongo::query::QueryBuilder;

/// Parameters for a phrase search over the recipes collection
pub struct RecipeSearch<'a> {
    pub phrase: &'a str,
    pub filters: &'a [Filter],
    /// Restrict matches to these ids (saved/owned searches); `None` searches
    /// the whole collection
    pub scope_ids: Option<&'a [ObjectId]>,
    /// Only match published recipes (the public search)
    pub published_only: bool,
    pub limit: i64,
    pub offset: u64,
}

fn search_filter(params: &RecipeSearch<'_>) -> Document {
    let mut builder = QueryBuilder::new();
    builder.push(doc! { "$text": { "$search": params.phrase } });
    if let Some(ids) = params.scope_ids {
        builder.where_id_in(ids);
    }
    apply_filters(&mut builder, params.filters);
    if params.published_only {
        builder.where_equals("published", Bson::Boolean(true));
    }
    builder.into_filter()
}

/// Full-text search ordered by relevance score, best match first
pub async fn search(
    recipes: &Collection<RecipeDoc>,
    params: RecipeSearch<'_>,
) -> Result<Vec<RecipeDoc>, DataError> {
    let filter = search_filter(&params);
    let cursor = recipes
        .find(filter)
        .projection(doc! { "score": { "$meta": "textScore" } })
        .sort(doc! { "score": { "$meta": "textScore" } })
        .skip(params.offset)
        .limit(params.limit)
        .await?;
    Ok(cursor.try_collect().await?)
}

pub async fn find_by_id(
    recipes: &Collection<RecipeDoc>,
    id: ObjectId,
) -> Result<Option<RecipeDoc>, DataError> {
    Ok(recipes.find_one(doc! { "_id": id }).await?)
}

/// Fetch a page of recipes by id
pub async fn find_by_ids(
    recipes: &Collection<RecipeDoc>,
    ids: &[ObjectId],
    offset: u64,
    limit: i64,
) -> Result<Vec<RecipeDoc>, DataError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new();
    builder.where_id_in(ids);
    let cursor = recipes
        .find(builder.into_filter())
        .skip(offset)
        .limit(limit)
        .await?;
    Ok(cursor.try_collect().await?)
}

/// Insert a recipe and return it with its assigned id
pub async fn insert(
    recipes: &Collection<RecipeDoc>,
    mut recipe: RecipeDoc,
) -> Result<RecipeDoc, DataError> {
    let result = recipes.insert_one(&recipe).await?;
    recipe.id = result.inserted_id.as_object_id();
    Ok(recipe)
}

/// Apply field updates and return the post-update document
pub async fn update_set(
    recipes: &Collection<RecipeDoc>,
    id: ObjectId,
    changes: Document,
) -> Result<Option<RecipeDoc>, DataError> {
    Ok(recipes
        .find_one_and_update(doc! { "_id": id }, doc! { "$set": changes })
        .return_document(ReturnDocument::After)
        .await?)
}

/// Delete a recipe, returning the removed document if it existed
pub async fn delete(
    recipes: &Collection<RecipeDoc>,
    id: ObjectId,
) -> Result<Option<RecipeDoc>, DataError> {
    Ok(recipes.find_one_and_delete(doc! { "_id": id }).await?)
}

pub async fn delete_many(
    recipes: &Collection<RecipeDoc>,
    ids: &[ObjectId],
) -> Result<u64, DataError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = recipes
        .delete_many(doc! { "_id": { "$in": ids.to_vec() } })
        .await?;
    Ok(result.deleted_count)
}

/// Duplicate check used by the scraped-recipe import
pub async fn exists_by_name_and_author(
    recipes: &Collection<RecipeDoc>,
    name: &str,
    author: ObjectId,
) -> Result<bool, DataError> {
    Ok(recipes
        .find_one(doc! { "name": name, "author": author })
        .await?
        .is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params<'a>(filters: &'a [Filter], scope: Option<&'a [ObjectId]>) -> RecipeSearch<'a> {
        RecipeSearch {
            phrase: "chicken soup",
            filters,
            scope_ids: scope,
            published_only: false,
            limit: 50,
            offset: 0,
        }
    }

    #[test]
    fn test_search_filter_text_clause_only() {
        let filter = search_filter(&params(&[], None));
        assert_eq!(filter, doc! { "$text": { "$search": "chicken soup" } });
    }

    #[test]
    fn test_search_filter_public_adds_published_clause() {
        let mut p = params(&[], None);
        p.published_only = true;
        let filter = search_filter(&p);
        let and = filter.get_array("$and").unwrap();
        assert_eq!(and.len(), 2);
        assert_eq!(
            and[1].as_document().unwrap(),
            &doc! { "published": true }
        );
    }

    #[test]
    fn test_search_filter_scoped_to_ids() {
        let ids = vec![ObjectId::new()];
        let filter = search_filter(&params(&[], Some(&ids)));
        let and = filter.get_array("$and").unwrap();
        assert!(and[1].as_document().unwrap().contains_key("_id"));
    }

    #[test]
    fn test_search_filter_applies_caller_filters_between_scope_and_published() {
        let ids = vec![ObjectId::new()];
        let filters = vec![Filter::new("tags", "IN", vec!["vegan".into()])];
        let mut p = params(&filters, Some(&ids));
        p.published_only = true;
        let filter = search_filter(&p);
        let and = filter.get_array("$and").unwrap();
        assert_eq!(and.len(), 4);
        assert!(and[0].as_document().unwrap().contains_key("$text"));
        assert!(and[1].as_document().unwrap().contains_key("_id"));
        assert!(and[2].as_document().unwrap().contains_key("tags"));
        assert!(and[3].as_document().unwrap().contains_key("published"));
    }
}
