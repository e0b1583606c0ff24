//! # RemoteJSONEnvs Engine
//!
//! Resolves JSON values kept in remote stores and injects them as environment
//! variables into every function resource of a compiled deployment template.
//!
//! ## Key Features
//!
//! - **Config Validation**: turns `custom.RemoteJSONEnvs` into a typed [`ProviderDescriptor`]
//!   and rejects malformed shapes before any network activity
//! - **Concurrent Fetch**: one request per item, all in flight at once, results kept in item order
//! - **Partial-failure Tolerance**: missing keys and missing sub-fields become warnings, not errors
//! - **Deterministic Merge**: later items win on key collision, and merged values win over the
//!   template's existing variables
//!
//! ## Usage
//!
//! ```ignore
//! use remote_json_envs_api::{AwsCliConfig, HttpClientConfig};
//! use remote_json_envs_engine::{HOOK, RemoteJsonEnvs, RemoteSources};
//!
//! # async fn demo(config: serde_json::Value, mut template: serde_json::Value) -> anyhow::Result<()> {
//! let sources = RemoteSources::aws_cli(AwsCliConfig::default(), &HttpClientConfig::default())?;
//! let plugin = RemoteJsonEnvs::new(sources);
//! if let Some(outcome) = plugin.run_hook(HOOK, &config, &mut template).await? {
//!     println!("updated {} functions", outcome.functions_updated);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`config`**: feature-section lookup and validation
//! - **`dispatch`**: provider routing and the [`RemoteSources`] bundle
//! - **`fetch`**: per-provider fetch strategies
//! - **`extract`**: `secretJSONKey` extraction and the [`WarningSink`] channel
//! - **`merge`** / **`inject`**: building the flat mapping and writing it into the template
//! - **`plugin`**: the [`RemoteJsonEnvs`] entry point tying the stages together

pub mod config;
pub mod dispatch;
mod error;
pub mod extract;
pub mod fetch;
pub mod inject;
pub mod merge;
pub mod plugin;

#[cfg(test)]
mod testing;

pub use config::{FEATURE_KEY, feature_section, parse_feature_section, parse_remote_json_envs_config};
pub use dispatch::{RemoteSources, resolve_descriptor};
pub use error::{ConfigError, ProcessingError, RemoteJsonEnvsError, TemplateError};
pub use extract::{TracingWarningSink, WarningSink, extract_secrets};
pub use inject::{FUNCTION_RESOURCE_TYPE, inject_environment};
pub use merge::merge_secrets;
pub use plugin::{HOOK, PackageOutcome, RemoteJsonEnvs};

pub use remote_json_envs_types::{MergedSecrets, ProviderDescriptor, ProviderKind, RawResult};
