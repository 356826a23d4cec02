use std::env;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::Credentials;

pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const REGION_ENV: &str = "AWS_REGION";
pub const BUCKET_ENV: &str = "S3_BUCKET_NAME";
pub const SOURCE_PHOTO_ENV: &str = "SOURCE_PHOTO";
pub const TARGET_PHOTO_ENV: &str = "TARGET_PHOTO";

/// Settings read once at startup. Values are passed through as-is; a missing
/// variable becomes an empty string and the remote service reports the
/// failure, not this process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub source_photo: String,
    pub target_photo: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).unwrap_or_default();
        Self {
            access_key_id: get(ACCESS_KEY_ENV),
            secret_access_key: get(SECRET_KEY_ENV),
            region: get(REGION_ENV),
            bucket: get(BUCKET_ENV),
            source_photo: get(SOURCE_PHOTO_ENV),
            target_photo: get(TARGET_PHOTO_ENV),
        }
    }

    /// Shared AWS client configuration built from the loaded settings. Empty
    /// credentials or region are passed through and rejected remotely.
    pub async fn aws_config(&self) -> SdkConfig {
        let credentials = Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            None,
            None,
            "environment",
        );
        aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(self.region.clone()))
            .load()
            .await
    }
}
