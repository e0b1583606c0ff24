//! Field extraction: pull `secretJSONKey` out of each fetched JSON value.
//!
//! Extraction never fails. A missing item or a missing sub-field produces a
//! warning line and leaves that item without a value.

use remote_json_envs_types::{ProviderDescriptor, RawResult};
use tracing::warn;

/// Single-line warning channel of the host.
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink that forwards warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWarningSink;

impl WarningSink for TracingWarningSink {
    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}

pub fn key_not_found_message(address: &str) -> String {
    format!("RemoteJSONEnvs warning: \"{address}\" key not found")
}

pub fn field_not_found_message(secret_json_key: &str, address: &str) -> String {
    format!("RemoteJSONEnvs warning: \"{secret_json_key}\" is not a valid secretJSONKey for {address} value")
}

/// Attach the extracted sub-field to every item of `descriptor`.
///
/// `results[i]` belongs to item `i`. Returns the number of items that ended
/// up with a value.
pub fn extract_secrets(descriptor: &mut ProviderDescriptor, results: &[RawResult], warnings: &dyn WarningSink) -> usize {
    let mut extracted = 0;
    for (index, item) in descriptor.items_mut().into_iter().enumerate() {
        let Some(raw) = results.get(index).and_then(|result| result.value.as_ref()) else {
            warnings.warn(&key_not_found_message(item.address()));
            item.set_value(None);
            continue;
        };

        let field = item
            .secret_json_key()
            .and_then(|secret_json_key| raw.get(secret_json_key))
            .filter(|value| !value.is_null())
            .cloned();
        if field.is_some() {
            extracted += 1;
        } else {
            let secret_json_key = item.secret_json_key().unwrap_or("undefined");
            warnings.warn(&field_not_found_message(secret_json_key, item.address()));
        }
        item.set_value(field);
    }
    extracted
}
