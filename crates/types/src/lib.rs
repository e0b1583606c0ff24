//! Shared type definitions for remote JSON environment resolution.
//!
//! These types describe a single packaging run: which remote provider was
//! selected ([`ProviderKind`]), the ordered items to fetch from it
//! ([`ProviderDescriptor`]), what each fetch returned ([`RawResult`]), and the
//! flat environment mapping produced at the end ([`MergedSecrets`]).
//!
//! Everything here is plain data. Validation lives in the engine, which is the
//! only place that turns loose user configuration into a [`ProviderDescriptor`].

mod descriptor;
mod provider;

pub use descriptor::{HttpItem, ProviderDescriptor, SecretItem, StoreItem};
pub use provider::{ProviderFamily, ProviderKind};

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// Flat mapping from environment-variable name to value.
///
/// Later sources overwrite earlier ones on identical keys.
pub type MergedSecrets = JsonMap<String, Value>;

/// Outcome of resolving one item against a remote provider.
///
/// `value` is `None` when the remote source reported the item as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub value: Option<Value>,
}

impl RawResult {
    pub fn found(value: Value) -> Self {
        Self { value: Some(value) }
    }

    pub fn missing() -> Self {
        Self { value: None }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }
}

impl From<Option<Value>> for RawResult {
    fn from(value: Option<Value>) -> Self {
        Self { value }
    }
}
