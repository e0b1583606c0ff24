use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ProviderKind;

/// Common view over the per-provider item shapes.
///
/// The Field Extractor writes `value` through this trait; it is the only writer.
pub trait SecretItem: Send + Sync {
    /// Remote address of the item (store key or endpoint URL).
    fn address(&self) -> &str;
    /// Name of the field to pull out of the fetched JSON value.
    fn secret_json_key(&self) -> Option<&str>;
    /// Extracted sub-field, unset until extraction ran.
    fn value(&self) -> Option<&Value>;
    fn set_value(&mut self, value: Option<Value>);
}

/// Item addressed by a key in a parameter store or object store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub key: String,
    #[serde(rename = "secretJSONKey", default, skip_serializing_if = "Option::is_none")]
    pub secret_json_key: Option<String>,
    #[serde(skip)]
    pub value: Option<Value>,
}

impl StoreItem {
    pub fn new(key: impl Into<String>, secret_json_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret_json_key: Some(secret_json_key.into()),
            value: None,
        }
    }
}

impl SecretItem for StoreItem {
    fn address(&self) -> &str {
        &self.key
    }

    fn secret_json_key(&self) -> Option<&str> {
        self.secret_json_key.as_deref()
    }

    fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }
}

/// Item fetched from an HTTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpItem {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "secretJSONKey", default, skip_serializing_if = "Option::is_none")]
    pub secret_json_key: Option<String>,
    /// Explicit HTTP method; defaults to GET, or POST when a body is declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip)]
    pub value: Option<Value>,
}

impl HttpItem {
    pub fn new(url: impl Into<String>, secret_json_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret_json_key: Some(secret_json_key.into()),
            ..Default::default()
        }
    }

    /// Method to use for the request, normalized to upper case.
    pub fn effective_method(&self) -> String {
        match (&self.method, &self.body) {
            (Some(method), _) => method.to_ascii_uppercase(),
            (None, Some(_)) => "POST".to_string(),
            (None, None) => "GET".to_string(),
        }
    }
}

impl SecretItem for HttpItem {
    fn address(&self) -> &str {
        &self.url
    }

    fn secret_json_key(&self) -> Option<&str> {
        self.secret_json_key.as_deref()
    }

    fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated feature configuration for one packaging run.
///
/// Exactly one provider is selected per run; the variant decides which fetch
/// strategy handles the items.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderDescriptor {
    ParameterStore(Vec<StoreItem>),
    ObjectStore(Vec<StoreItem>),
    HttpRequest(Vec<HttpItem>),
}

impl ProviderDescriptor {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderDescriptor::ParameterStore(_) => ProviderKind::SsmParameterStore,
            ProviderDescriptor::ObjectStore(_) => ProviderKind::S3,
            ProviderDescriptor::HttpRequest(_) => ProviderKind::HttpRequest,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ProviderDescriptor::ParameterStore(items) | ProviderDescriptor::ObjectStore(items) => items.len(),
            ProviderDescriptor::HttpRequest(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items in declaration order.
    pub fn items(&self) -> Vec<&dyn SecretItem> {
        match self {
            ProviderDescriptor::ParameterStore(items) | ProviderDescriptor::ObjectStore(items) => {
                items.iter().map(|item| item as &dyn SecretItem).collect()
            }
            ProviderDescriptor::HttpRequest(items) => items.iter().map(|item| item as &dyn SecretItem).collect(),
        }
    }

    pub fn items_mut(&mut self) -> Vec<&mut dyn SecretItem> {
        match self {
            ProviderDescriptor::ParameterStore(items) | ProviderDescriptor::ObjectStore(items) => {
                items.iter_mut().map(|item| item as &mut dyn SecretItem).collect()
            }
            ProviderDescriptor::HttpRequest(items) => items.iter_mut().map(|item| item as &mut dyn SecretItem).collect(),
        }
    }

    pub fn addresses(&self) -> Vec<&str> {
        self.items().into_iter().map(SecretItem::address).collect()
    }
}
