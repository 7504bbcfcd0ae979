//! Photo storage on S3-compatible object stores
//!
//! Uploaded photos land in one of two buckets (recipe photos, user profile
//! pictures) and are addressed afterwards by their public URL only. Removal
//! works backwards from that URL to the object key.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use crate::core::config::MediaConfig;
use crate::data::error::DataError;

/// Which bucket a photo belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    /// Recipe photos
    Recipe,
    /// User profile pictures
    User,
}

/// Object storage client for photo uploads
#[derive(Clone)]
pub struct MediaStore {
    s3: aws_sdk_s3::Client,
    http: reqwest::Client,
    config: MediaConfig,
}

impl MediaStore {
    pub async fn init(config: MediaConfig) -> Result<Self, DataError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }
        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            // Path-style addressing for MinIO and other S3-compatible stores
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let s3 = aws_sdk_s3::Client::from_conf(builder.build());
        let http = reqwest::Client::builder()
            .user_agent("foodtomake")
            .build()?;
        tracing::info!(
            recipe_bucket = %config.recipe_bucket,
            user_bucket = %config.user_bucket,
            "Media storage initialized"
        );
        Ok(Self { s3, http, config })
    }

    fn bucket(&self, kind: BucketKind) -> &str {
        match kind {
            BucketKind::Recipe => &self.config.recipe_bucket,
            BucketKind::User => &self.config.user_bucket,
        }
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.config.public_base_url, bucket, key)
    }

    fn key_from_url<'a>(&self, bucket: &str, url: &'a str) -> Option<&'a str> {
        let prefix = format!("{}/{}/", self.config.public_base_url, bucket);
        url.strip_prefix(prefix.as_str())
    }

    /// Upload one photo and return its public URL
    ///
    /// The key is prefixed with a fresh UUID so repeated uploads of the same
    /// filename never collide or overwrite.
    pub async fn upload_photo(
        &self,
        kind: BucketKind,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, DataError> {
        let bucket = self.bucket(kind);
        let key = format!("{}-{}", Uuid::new_v4(), sanitize_filename(filename));
        let mut request = self
            .s3
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(ByteStream::from(bytes));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }
        request
            .send()
            .await
            .map_err(|e| DataError::storage(e.to_string()))?;
        let url = self.public_url(bucket, &key);
        tracing::debug!(%url, "Photo uploaded");
        Ok(url)
    }

    /// Upload a batch of photos, returning public URLs in input order
    pub async fn upload_photos(
        &self,
        kind: BucketKind,
        photos: Vec<(String, Option<String>, Vec<u8>)>,
    ) -> Result<Vec<String>, DataError> {
        let mut urls = Vec::with_capacity(photos.len());
        for (filename, content_type, bytes) in photos {
            urls.push(
                self.upload_photo(kind, &filename, content_type.as_deref(), bytes)
                    .await?,
            );
        }
        Ok(urls)
    }

    /// Download a photo from an external URI and store it in our bucket
    ///
    /// Used by the scraped-recipe import, where the photo lives on the
    /// scraped site and must be copied so it survives the source going away.
    pub async fn store_photo_from_uri(
        &self,
        kind: BucketKind,
        uri: &str,
        name: &str,
    ) -> Result<String, DataError> {
        let response = self.http.get(uri).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        self.upload_photo(kind, name, content_type.as_deref(), bytes)
            .await
    }

    /// Delete the object behind a public URL
    ///
    /// URLs that do not point into our bucket are ignored, so stale records
    /// referencing externally hosted images do not fail removal.
    pub async fn remove_image(&self, kind: BucketKind, url: &str) -> Result<(), DataError> {
        let bucket = self.bucket(kind);
        let Some(key) = self.key_from_url(bucket, url) else {
            tracing::debug!(%url, "Skipping removal of foreign image URL");
            return Ok(());
        };
        self.s3
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DataError::storage(e.to_string()))?;
        tracing::debug!(%url, "Photo removed");
        Ok(())
    }

    /// Delete a batch of objects by public URL
    pub async fn remove_images(&self, kind: BucketKind, urls: &[String]) -> Result<(), DataError> {
        for url in urls {
            self.remove_image(kind, url).await?;
        }
        Ok(())
    }
}

/// Keep keys URL-safe without mangling ordinary filenames
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_passthrough() {
        assert_eq!(sanitize_filename("pasta-01.jpg"), "pasta-01.jpg");
    }

    #[test]
    fn test_sanitize_filename_replaces_unsafe_chars() {
        assert_eq!(
            sanitize_filename("my soup (final).png"),
            "my_soup__final_.png"
        );
    }

    #[test]
    fn test_sanitize_filename_empty_fallback() {
        assert_eq!(sanitize_filename(""), "photo");
    }
}
