//! S3 size source using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service. Credentials are
//! read from the standard `AWS_*` environment variables or the instance
//! metadata service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};

use super::{ObjectSizeSource, sum_object_sizes};
use crate::config::S3Options;

/// Measures prefixes in an S3 bucket.
#[derive(Clone, Debug)]
pub struct S3Source {
    options: S3Options,
}

impl S3Source {
    /// Create a source with the given connection settings.
    #[must_use]
    pub const fn new(options: S3Options) -> Self {
        Self { options }
    }

    fn connect(&self, bucket: &str) -> Result<AmazonS3> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&self.options.region);

        if let Some(endpoint) = &self.options.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        builder
            .build()
            .with_context(|| format!("Failed to configure S3 client for bucket {bucket}"))
    }
}

#[async_trait]
impl ObjectSizeSource for S3Source {
    async fn total_size(&self, bucket: &str, prefix: &str) -> Result<u64> {
        let store = self.connect(bucket)?;
        sum_object_sizes(&store, prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_with_custom_endpoint() {
        let source = S3Source::new(S3Options {
            region: "us-east-1".to_string(),
            endpoint: Some("http://localhost:9000".to_string()),
        });

        assert!(source.connect("monitoring").is_ok());
    }

    #[test]
    fn test_connect_with_default_options() {
        let source = S3Source::new(S3Options::default());
        assert!(source.connect("monitoring").is_ok());
    }
}
