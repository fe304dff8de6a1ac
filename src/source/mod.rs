//! Bucket size collection.
//!
//! An [`ObjectSizeSource`] lists every object under a prefix and sums the
//! reported sizes. [`S3Source`] and [`GcsSource`] build an `object_store`
//! client for their provider and share [`sum_object_sizes`], so both apply
//! the same paging and prefix semantics. [`BucketSource`] picks the variant
//! for the configured provider.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use humansize::{BINARY, format_size};
use object_store::ObjectStore;
use object_store::path::Path;
use tracing::debug;

use crate::config::{CheckConfig, Provider};

mod gcs;
mod s3;

pub use gcs::GcsSource;
pub use s3::S3Source;

/// Something that can report the total size of the objects under a prefix.
#[async_trait]
pub trait ObjectSizeSource {
    /// Sum the sizes of all objects in `bucket` whose key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be configured or any page of the
    /// listing fails. No partial sum is returned.
    async fn total_size(&self, bucket: &str, prefix: &str) -> Result<u64>;
}

/// The size source for the configured provider.
#[derive(Debug)]
pub enum BucketSource {
    /// Amazon S3
    S3(S3Source),

    /// Google Cloud Storage
    Gcs(GcsSource),
}

impl BucketSource {
    /// Create the source matching `config.target.provider`.
    #[must_use]
    pub fn from_config(config: &CheckConfig) -> Self {
        match config.target.provider {
            Provider::S3 => Self::S3(S3Source::new(config.s3.clone())),
            Provider::Gcs => Self::Gcs(GcsSource::new(config.gcs.clone())),
        }
    }
}

#[async_trait]
impl ObjectSizeSource for BucketSource {
    async fn total_size(&self, bucket: &str, prefix: &str) -> Result<u64> {
        match self {
            Self::S3(source) => source.total_size(bucket, prefix).await,
            Self::Gcs(source) => source.total_size(bucket, prefix).await,
        }
    }
}

/// Sum the sizes of every object in `store` whose key starts with `prefix`.
///
/// `prefix` is a plain string prefix: `logs` matches both `logs/a` and
/// `logs-old/b`. The listing request only covers the deepest directory of the
/// prefix and each returned key is filtered here. The list stream follows
/// continuation tokens, so the total covers every page.
///
/// Keys are compared in the form `object_store` returns them: a single
/// leading `/` is dropped, so it is dropped from `prefix` as well. Keys that
/// `object_store` cannot represent (empty, `.` or `..` segments, control
/// characters) fail the listing instead of being skipped.
///
/// # Errors
///
/// Returns an error if the prefix directory is not a valid object path, any
/// page of the listing fails, or the total overflows `u64`.
#[tracing::instrument(name = "bucket.sum", level = "trace", skip_all)]
pub async fn sum_object_sizes(store: &dyn ObjectStore, prefix: &str) -> Result<u64> {
    let prefix = key_prefix(prefix);
    let root = listing_root(prefix)?;
    let mut objects = store.list(root.as_ref());
    let mut total = 0_u64;

    while let Some(meta) = objects.try_next().await? {
        let key = meta.location.as_ref();
        if !key.starts_with(prefix) {
            debug!("Skipping {key}");
            continue;
        }

        debug!("Using {key} {}", meta.size);
        total = total
            .checked_add(meta.size)
            .ok_or_else(|| anyhow!("Total size overflow after {key}"))?;
    }

    debug!(
        "Total size in byte: {total} ({})",
        format_size(total, BINARY)
    );
    Ok(total)
}

/// Prefix in the form listed keys use, without a leading `/`.
fn key_prefix(prefix: &str) -> &str {
    prefix.strip_prefix('/').unwrap_or(prefix)
}

/// Directory part of a key prefix, `None` when the whole store must be listed.
///
/// The directory is parsed, not encoded, so characters such as `#` or `~`
/// stay as they appear in the bucket.
fn listing_root(prefix: &str) -> Result<Option<Path>> {
    let Some(dir) = prefix
        .rfind('/')
        .map(|idx| &prefix[..idx])
        .filter(|dir| !dir.is_empty())
    else {
        return Ok(None);
    };

    Path::parse(dir)
        .map(Some)
        .with_context(|| format!("Prefix {prefix:?} is not a valid object path"))
}

#[cfg(test)]
mod tests {
    use object_store::PutPayload;
    use object_store::memory::InMemory;

    use super::*;
    use crate::config::{CheckTarget, GcsOptions, S3Options, Thresholds};

    async fn store_with(objects: &[(&str, usize)]) -> InMemory {
        let store = InMemory::new();
        for (key, size) in objects {
            store
                .put(&Path::from(*key), PutPayload::from(vec![0_u8; *size]))
                .await
                .unwrap();
        }
        store
    }

    fn config_for(provider: Provider) -> CheckConfig {
        CheckConfig {
            target: CheckTarget {
                provider,
                bucket: "metrics".to_string(),
                prefix: String::new(),
            },
            thresholds: Thresholds::default(),
            debug: false,
            timeout: None,
            s3: S3Options::default(),
            gcs: GcsOptions::default(),
        }
    }

    #[test]
    fn test_listing_root() {
        assert_eq!(listing_root("").unwrap(), None);
        assert_eq!(listing_root("logs").unwrap(), None);
        assert_eq!(listing_root("/logs").unwrap(), None);
        assert_eq!(listing_root("logs/").unwrap(), Some(Path::from("logs")));
        assert_eq!(listing_root("logs/2024-").unwrap(), Some(Path::from("logs")));
        assert_eq!(listing_root("a/b/c").unwrap(), Some(Path::from("a/b")));
    }

    #[test]
    fn test_listing_root_keeps_raw_characters() {
        let root = listing_root("logs#1/").unwrap().unwrap();
        assert_eq!(root.as_ref(), "logs#1");

        let root = listing_root("home/~ops/b").unwrap().unwrap();
        assert_eq!(root.as_ref(), "home/~ops");
    }

    #[test]
    fn test_listing_root_rejects_empty_segment() {
        assert!(listing_root("a//b/").is_err());
        assert!(listing_root("a/../b/").is_err());
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(key_prefix(""), "");
        assert_eq!(key_prefix("logs/"), "logs/");
        assert_eq!(key_prefix("/logs/"), "logs/");
    }

    #[test]
    fn test_bucket_source_from_config() {
        assert!(matches!(
            BucketSource::from_config(&config_for(Provider::S3)),
            BucketSource::S3(_)
        ));
        assert!(matches!(
            BucketSource::from_config(&config_for(Provider::Gcs)),
            BucketSource::Gcs(_)
        ));
    }

    #[tokio::test]
    async fn test_sum_whole_store() {
        let store = store_with(&[("a.txt", 10), ("dir/b.txt", 20), ("dir/sub/c.txt", 30)]).await;
        assert_eq!(sum_object_sizes(&store, "").await.unwrap(), 60);
    }

    #[tokio::test]
    async fn test_sum_empty_store() {
        let store = InMemory::new();
        assert_eq!(sum_object_sizes(&store, "").await.unwrap(), 0);
        assert_eq!(sum_object_sizes(&store, "missing/").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sum_uses_string_prefix() {
        let store = store_with(&[("logs/a", 1), ("logsX/b", 2), ("other/c", 4)]).await;
        assert_eq!(sum_object_sizes(&store, "logs").await.unwrap(), 3);
        assert_eq!(sum_object_sizes(&store, "logs/").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sum_partial_file_name_prefix() {
        let store = store_with(&[
            ("db/2024-01.dump", 100),
            ("db/2024-02.dump", 200),
            ("db/2025-01.dump", 400),
        ])
        .await;

        assert_eq!(sum_object_sizes(&store, "db/2024-").await.unwrap(), 300);
        assert_eq!(sum_object_sizes(&store, "db/2025").await.unwrap(), 400);
    }

    #[tokio::test]
    async fn test_sum_nested_directories() {
        let store = store_with(&[("a/b/c/d", 5), ("a/b/e", 7), ("a/f", 11)]).await;
        assert_eq!(sum_object_sizes(&store, "a/b").await.unwrap(), 12);
        assert_eq!(sum_object_sizes(&store, "a/b/c").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_sum_prefix_with_reserved_characters() {
        let store = InMemory::new();
        for key in ["logs#1/a", "home/~ops/b", "logs/c"] {
            store
                .put(&Path::parse(key).unwrap(), PutPayload::from(vec![0_u8; 10]))
                .await
                .unwrap();
        }

        assert_eq!(sum_object_sizes(&store, "").await.unwrap(), 30);
        assert_eq!(sum_object_sizes(&store, "logs#1/").await.unwrap(), 10);
        assert_eq!(sum_object_sizes(&store, "home/~ops/").await.unwrap(), 10);
        assert_eq!(sum_object_sizes(&store, "home/~").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_sum_leading_slash_prefix() {
        let store = store_with(&[("logs/a", 3), ("other/b", 5)]).await;
        assert_eq!(sum_object_sizes(&store, "/logs/").await.unwrap(), 3);
        assert_eq!(sum_object_sizes(&store, "/").await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_sum_unlistable_prefix_fails() {
        let store = store_with(&[("a/b/c", 3)]).await;
        assert!(sum_object_sizes(&store, "a//b/").await.is_err());
    }
}
