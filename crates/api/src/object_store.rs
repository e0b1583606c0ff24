use std::fmt;

use async_trait::async_trait;
use remote_json_envs_types::RawResult;
use serde_json::Value;

use crate::{AwsCliConfig, StoreError, StoreResolver};

const OBJECT_NOT_FOUND_MARKERS: &[&str] = &["NoSuchKey", "(404)", "Not Found"];

/// Bucket and key of an object-store item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAddress {
    pub bucket: String,
    pub key: String,
}

impl ObjectAddress {
    /// Parse `s3://bucket/key` or `bucket/key`.
    pub fn parse(address: &str) -> Result<Self, StoreError> {
        let trimmed = address.strip_prefix("s3://").unwrap_or(address);
        match trimmed.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            _ => Err(StoreError::InvalidObjectAddress(address.to_string())),
        }
    }
}

impl fmt::Display for ObjectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// S3 resolver backed by `aws s3 cp <object> -`.
///
/// The object body is returned undecoded as a JSON string; decoding is left
/// to the object-store fetch strategy.
#[derive(Debug, Clone, Default)]
pub struct AwsCliObjectStore {
    config: AwsCliConfig,
}

impl AwsCliObjectStore {
    pub fn new(config: AwsCliConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StoreResolver for AwsCliObjectStore {
    async fn resolve(&self, address: &str) -> Result<RawResult, StoreError> {
        let object = ObjectAddress::parse(address)?.to_string();
        let args = ["s3", "cp", object.as_str(), "-"];
        match self.config.run(&args, OBJECT_NOT_FOUND_MARKERS).await? {
            Some(body) => {
                let text = String::from_utf8(body)
                    .map_err(|_| StoreError::malformed_output(&self.config.program, format!("{object} is not valid UTF-8")))?;
                Ok(RawResult::found(Value::String(text)))
            }
            None => Ok(RawResult::missing()),
        }
    }

    fn name(&self) -> &'static str {
        "s3-object-store"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_both_address_forms() {
        let expected = ObjectAddress {
            bucket: "configs".into(),
            key: "staging/app.json".into(),
        };
        assert_eq!(ObjectAddress::parse("s3://configs/staging/app.json").expect("uri"), expected);
        assert_eq!(ObjectAddress::parse("configs/staging/app.json").expect("path"), expected);
        assert_eq!(expected.to_string(), "s3://configs/staging/app.json");
    }

    #[test]
    fn rejects_addresses_without_bucket_or_key() {
        for address in ["configs", "s3://configs/", "/key.json", ""] {
            assert!(
                matches!(ObjectAddress::parse(address), Err(StoreError::InvalidObjectAddress(_))),
                "{address} should be rejected"
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn resolve_returns_body_as_string() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = r#"
if [ "$3" = "s3://configs/app.json" ]; then
  printf '{"app":{"MODE":"live"}}'
else
  echo "fatal error: An error occurred (404) when calling the HeadObject operation: Key not found" >&2
  exit 1
fi"#;
        let store = AwsCliObjectStore::new(crate::aws::fake_cli(dir.path(), script));

        let found = store.resolve("configs/app.json").await.expect("resolve");
        assert_eq!(found, RawResult::found(json!(r#"{"app":{"MODE":"live"}}"#)));

        let missing = store.resolve("configs/missing.json").await.expect("resolve");
        assert!(missing.is_missing());
    }
}
