/// Object store access module
///
/// This module handles all traffic to the S3 bucket holding the snapshots:
/// - Client construction from the secrets file (this file)
/// - Bucket listing and date-label derivation (listing.rs)
/// - Snapshot download and decoding (fetch.rs)
pub mod fetch;
pub mod listing;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;
use thiserror::Error;

use crate::config::Secrets;

/// Errors from the object store or the decode step
///
/// Every variant carries the underlying cause as text; the UI shows these
/// messages in place of the content that failed to load.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not list the bucket: {0}")]
    List(String),
    #[error("could not download {key}: {message}")]
    Download { key: String, message: String },
    #[error("could not decode {key}: {message}")]
    Decode { key: String, message: String },
}

/// Handle to the snapshot bucket.
///
/// Bundles the S3 client with the bucket name and key prefix so the UI can
/// clone one value into its background tasks.
#[derive(Debug, Clone)]
pub struct Store {
    client: Client,
    bucket: String,
    prefix: String,
}

impl Store {
    /// Connect to S3 with credentials from the secrets file.
    ///
    /// Credentials are passed explicitly; the client never falls back to
    /// environment discovery, so a bad secrets file fails loudly at the
    /// first listing instead of silently picking up someone else's profile.
    pub async fn connect(secrets: &Secrets, bucket: &str, prefix: &str) -> Self {
        let credentials = Credentials::new(
            secrets.aws_access_key_id.clone(),
            secrets.aws_secret_access_key.clone(),
            None,
            None,
            "penage-viewer-secrets",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(secrets.region_name.clone()))
            .load()
            .await;

        Store {
            client: Client::new(&config),
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// List the snapshot dates available in the bucket, newest first.
    pub async fn list_dates(&self) -> Result<Vec<String>, StoreError> {
        listing::list_dates(&self.client, &self.bucket, &self.prefix).await
    }

    /// Download and decode the snapshot for one date label.
    pub async fn fetch_image(&self, label: &str) -> Result<fetch::FetchedImage, StoreError> {
        let key = listing::object_key(label, &self.prefix);
        fetch::fetch_image(&self.client, &self.bucket, &key).await
    }
}

#[cfg(test)]
pub(crate) fn test_client() -> Client {
    // No region or credentials; requests fail fast without touching the network.
    Client::from_conf(
        aws_sdk_s3::Config::builder()
            .behavior_version_latest()
            .build(),
    )
}

#[cfg(test)]
impl Store {
    /// A store whose requests always fail; enough for exercising state logic.
    pub(crate) fn stub() -> Self {
        Store {
            client: test_client(),
            bucket: "penage-true-color-images".to_string(),
            prefix: String::new(),
        }
    }
}
