//! Merge extracted values into one flat mapping.

use remote_json_envs_types::{MergedSecrets, ProviderDescriptor};
use serde_json::Value;

/// Fold every item's value into a single mapping, in item order.
///
/// An object value contributes each of its entries; any other value is stored
/// under the item's `secretJSONKey`. Later items overwrite earlier ones on key
/// collision. Items without a value contribute nothing.
pub fn merge_secrets(descriptor: &ProviderDescriptor) -> MergedSecrets {
    let mut merged = MergedSecrets::new();
    for item in descriptor.items() {
        match item.value() {
            Some(Value::Object(entries)) => {
                for (name, value) in entries {
                    merged.insert(name.clone(), value.clone());
                }
            }
            Some(value) => {
                if let Some(secret_json_key) = item.secret_json_key() {
                    merged.insert(secret_json_key.to_string(), value.clone());
                }
            }
            None => {}
        }
    }
    merged
}
