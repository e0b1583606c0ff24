//! Feature configuration parsing and validation.
//!
//! The feature block lives at `custom.RemoteJSONEnvs` in the host's
//! declarative input:
//!
//! ```yaml
//! custom:
//!   RemoteJSONEnvs:
//!     provider:
//!       aws:
//!         SSMParameterStore:
//!           - key: /staging/app/secrets
//!             secretJSONKey: database
//! ```
//!
//! The provider family is the first key under `provider` (`aws` or `api`) and
//! the concrete provider is the first key under the family. This module is the
//! single point where that loose shape becomes a [`ProviderDescriptor`]; every
//! rejection happens here, before any network activity.

use remote_json_envs_api::validate_url;
use remote_json_envs_types::{HttpItem, ProviderDescriptor, ProviderFamily, ProviderKind, StoreItem};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::ConfigError;

/// Key of the feature block under `custom`.
pub const FEATURE_KEY: &str = "RemoteJSONEnvs";

/// Return the feature block of the host configuration, if present.
///
/// A falsy block (`null`, `false`, `""`, `0`) switches the feature off.
pub fn feature_section(configuration_input: &Value) -> Option<&Value> {
    configuration_input
        .get("custom")?
        .get(FEATURE_KEY)
        .filter(|section| !is_falsy(section))
}

/// Parse the feature configuration out of the full host configuration.
///
/// Returns `Ok(None)` when the feature block is absent, which makes the whole
/// pipeline a no-op.
pub fn parse_remote_json_envs_config(configuration_input: &Value) -> Result<Option<ProviderDescriptor>, ConfigError> {
    match feature_section(configuration_input) {
        Some(section) => parse_feature_section(section).map(Some),
        None => {
            debug!("no {FEATURE_KEY} configuration found");
            Ok(None)
        }
    }
}

/// Validate a feature block and normalize it into a [`ProviderDescriptor`].
pub fn parse_feature_section(section: &Value) -> Result<ProviderDescriptor, ConfigError> {
    let provider = section
        .get("provider")
        .filter(|provider| !provider.is_null())
        .ok_or(ConfigError::ProviderNotDefined)?;
    let (family_name, family_block) = first_entry(provider).ok_or(ConfigError::ProviderNotDefined)?;
    let family = ProviderFamily::from_name(family_name).ok_or_else(|| ConfigError::UnknownFamily(family_name.to_string()))?;

    let (provider_name, items) = first_entry(family_block).ok_or_else(|| ConfigError::UnsupportedProvider {
        family,
        found: String::new(),
    })?;
    let kind = ProviderKind::from_name(family, provider_name).ok_or_else(|| ConfigError::UnsupportedProvider {
        family,
        found: provider_name.to_string(),
    })?;

    let items = item_array(kind, items)?;
    let descriptor = match kind {
        ProviderKind::SsmParameterStore => ProviderDescriptor::ParameterStore(parse_items::<StoreItem>(kind, items)?),
        ProviderKind::S3 => ProviderDescriptor::ObjectStore(parse_items::<StoreItem>(kind, items)?),
        ProviderKind::HttpRequest => ProviderDescriptor::HttpRequest(check_urls(kind, parse_items::<HttpItem>(kind, items)?)?),
    };
    debug!(provider = %kind, items = descriptor.len(), "validated {FEATURE_KEY} configuration");
    Ok(descriptor)
}

fn first_entry(value: &Value) -> Option<(&str, &Value)> {
    value.as_object()?.iter().next().map(|(key, value)| (key.as_str(), value))
}

fn item_array(kind: ProviderKind, value: &Value) -> Result<&[Value], ConfigError> {
    match value {
        value if is_falsy(value) => Err(ConfigError::ProviderNotConfigured { kind }),
        Value::Array(items) => Ok(items),
        Value::Object(_) => Err(ConfigError::NotAnArray { kind }),
        _ => Err(ConfigError::NotAnObject { kind }),
    }
}

fn parse_items<T: DeserializeOwned>(kind: ProviderKind, items: &[Value]) -> Result<Vec<T>, ConfigError> {
    let field = kind.address_field();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            match item.get(field) {
                None => return Err(ConfigError::MissingItemField { kind, index, field }),
                Some(address) if is_falsy(address) => return Err(ConfigError::MissingItemField { kind, index, field }),
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(ConfigError::FieldNotString {
                        kind,
                        index,
                        field,
                        found: other.to_string(),
                    });
                }
            }
            serde_json::from_value(item.clone()).map_err(|error| ConfigError::InvalidItem {
                kind,
                index,
                reason: error.to_string(),
            })
        })
        .collect()
}

fn check_urls(kind: ProviderKind, items: Vec<HttpItem>) -> Result<Vec<HttpItem>, ConfigError> {
    for (index, item) in items.iter().enumerate() {
        validate_url(&item.url).map_err(|error| ConfigError::InvalidItem {
            kind,
            index,
            reason: error.to_string(),
        })?;
    }
    Ok(items)
}

/// Values the host treats as "not provided".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}
