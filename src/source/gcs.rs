//! Google Cloud Storage size source using
//! [`object_store::gcp::GoogleCloudStorageBuilder`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};

use super::{ObjectSizeSource, sum_object_sizes};
use crate::config::GcsOptions;

/// Measures prefixes in a GCS bucket.
///
/// Without an explicit service-account key the builder falls back to the
/// `GOOGLE_*` environment variables and application default credentials.
#[derive(Clone, Debug)]
pub struct GcsSource {
    options: GcsOptions,
}

impl GcsSource {
    /// Create a source with the given connection settings.
    #[must_use]
    pub const fn new(options: GcsOptions) -> Self {
        Self { options }
    }

    fn connect(&self, bucket: &str) -> Result<GoogleCloudStorage> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);

        if let Some(key_path) = &self.options.service_account {
            builder = builder.with_service_account_path(key_path.to_string_lossy());
        }

        builder
            .build()
            .with_context(|| format!("Failed to configure GCS client for bucket {bucket}"))
    }
}

#[async_trait]
impl ObjectSizeSource for GcsSource {
    async fn total_size(&self, bucket: &str, prefix: &str) -> Result<u64> {
        let store = self.connect(bucket)?;
        sum_object_sizes(&store, prefix).await
    }
}
