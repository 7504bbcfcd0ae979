//! Data storage layer
//!
//! - `mongo` - MongoDB document store (users, recipes)
//! - `media` - S3-compatible photo storage
//! - `error` - Unified error type for the layer

pub mod error;
pub mod media;
pub mod mongo;

pub use error::DataError;
pub use media::MediaStore;
pub use mongo::MongoService;
