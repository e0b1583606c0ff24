//! Remote store clients for JSON environment resolution.
//!
//! This crate holds the collaborators the resolution pipeline talks to:
//!
//! - [`StoreResolver`]: the uniform `resolve(address) -> RawResult` contract
//!   shared by the parameter-store and object-store strategies
//! - [`AwsCliParameterStore`] / [`AwsCliObjectStore`]: resolvers backed by the
//!   `aws` command line tool, honoring region/profile overrides
//! - [`JsonHttpClient`]: a `reqwest` client preconfigured with a request
//!   timeout and JSON content headers for the HTTP strategy
//!
//! # Example
//!
//! ```ignore
//! use remote_json_envs_api::{AwsCliConfig, AwsCliParameterStore, StoreResolver};
//!
//! # async fn demo() -> Result<(), remote_json_envs_api::StoreError> {
//! let store = AwsCliParameterStore::new(AwsCliConfig::default());
//! let result = store.resolve("/staging/app/secrets").await?;
//! if result.is_missing() {
//!     println!("parameter not found");
//! }
//! # Ok(())
//! # }
//! ```

mod aws;
mod error;
mod http;
mod object_store;
mod parameter_store;

pub use aws::AwsCliConfig;
pub use error::StoreError;
pub use http::{DEFAULT_HTTP_TIMEOUT, HttpClientConfig, HttpResponse, JsonHttpClient, validate_url};
pub use object_store::{AwsCliObjectStore, ObjectAddress};
pub use parameter_store::AwsCliParameterStore;

use async_trait::async_trait;
use remote_json_envs_types::RawResult;

/// Resolves a store address into its fetched value.
///
/// Implementations return `Ok(RawResult { value: None })` when the store
/// reports the address as absent, and `Err` for every other failure.
#[async_trait]
pub trait StoreResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<RawResult, StoreError>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}
