//! MongoDB access layer
//!
//! - `models` - Stored document shapes
//! - `query` - Incremental filter document builder
//! - `filters` - Search filter descriptors and translation
//! - `repositories` - Collection-level data operations

pub mod filters;
pub mod models;
pub mod query;
pub mod repositories;

use bson::{doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::core::config::DatabaseConfig;
use crate::core::constants::{RECIPES_COLLECTION, USERS_COLLECTION};
use crate::data::error::DataError;
use models::{RecipeDoc, UserDoc};

/// Parse a caller-supplied document id, mapping malformed input to a
/// data-layer error instead of a panic
pub fn parse_object_id(id: &str) -> Result<ObjectId, DataError> {
    ObjectId::parse_str(id).map_err(|_| DataError::invalid_id(id))
}

/// MongoDB connection and typed collection handles
#[derive(Clone)]
pub struct MongoService {
    db: Database,
}

impl MongoService {
    /// Connect to MongoDB and ensure the indexes the app relies on
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        tracing::debug!(db = %config.name, "Connecting to MongoDB");
        let client = Client::with_uri_str(&config.url).await?;
        let db = client.database(&config.name);
        let service = Self { db };
        service.ensure_indexes().await?;
        tracing::info!(db = %config.name, "MongoDB connection established");
        Ok(service)
    }

    pub fn users(&self) -> Collection<UserDoc> {
        self.db.collection(USERS_COLLECTION)
    }

    pub fn recipes(&self) -> Collection<RecipeDoc> {
        self.db.collection(RECIPES_COLLECTION)
    }

    /// Liveness probe against the server
    pub async fn ping(&self) -> Result<(), DataError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<(), DataError> {
        let username_unique = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("username_unique".to_string())
                    .build(),
            )
            .build();
        self.users().create_index(username_unique).await?;

        // Weighted text index backing phrase search. Name matches count most.
        let recipe_text = IndexModel::builder()
            .keys(doc! {
                "name": "text",
                "ingredients": "text",
                "instructions": "text",
                "description": "text",
            })
            .options(
                IndexOptions::builder()
                    .weights(doc! {
                        "name": 4,
                        "ingredients": 2,
                        "instructions": 1,
                        "description": 2,
                    })
                    .name("recipe_text_search".to_string())
                    .build(),
            )
            .build();
        self.recipes().create_index(recipe_text).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_valid() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn test_parse_object_id_malformed() {
        let err = parse_object_id("not-an-id").unwrap_err();
        assert!(matches!(err, DataError::InvalidId(_)));
    }
}
