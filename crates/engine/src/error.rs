//! Error types for the resolution pipeline.
//!
//! [`ConfigError`] and [`ProcessingError`] are fatal and abort the packaging
//! run before the template is touched. Extraction problems are never errors;
//! they are reported through a [`WarningSink`](crate::WarningSink).

use remote_json_envs_api::StoreError;
use remote_json_envs_types::{ProviderFamily, ProviderKind};
use thiserror::Error;

/// Malformed or incomplete feature configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RemoteJSONEnvs provider is not defined")]
    ProviderNotDefined,

    #[error("RemoteJSONEnvs provider '{0}' is not defined; supported providers are aws and api")]
    UnknownFamily(String),

    #[error(
        "RemoteJSONEnvs {family} provider is not correctly configured (found '{found}'); supported: {}",
        supported_providers(.family)
    )]
    UnsupportedProvider { family: ProviderFamily, found: String },

    #[error("RemoteJSONEnvs provider {} {kind} is not configured", .kind.family())]
    ProviderNotConfigured { kind: ProviderKind },

    #[error("RemoteJSONEnvs provider {} {kind} is not an object", .kind.family())]
    NotAnObject { kind: ProviderKind },

    #[error("RemoteJSONEnvs provider {} {kind} is not an array", .kind.family())]
    NotAnArray { kind: ProviderKind },

    #[error("RemoteJSONEnvs provider {kind} item {index} must contain a {field}")]
    MissingItemField { kind: ProviderKind, index: usize, field: &'static str },

    #[error("RemoteJSONEnvs provider {kind} item {index}: {field} must be a string, got {found}")]
    FieldNotString {
        kind: ProviderKind,
        index: usize,
        field: &'static str,
        found: String,
    },

    #[error("RemoteJSONEnvs provider {kind} item {index} is invalid: {reason}")]
    InvalidItem { kind: ProviderKind, index: usize, reason: String },
}

fn supported_providers(family: &ProviderFamily) -> String {
    family.providers().iter().map(|kind| kind.name()).collect::<Vec<_>>().join(" or ")
}

/// A remote fetch failed.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("RemoteJSONEnvs {provider} could not resolve '{address}': {source}")]
    Resolve {
        provider: ProviderKind,
        address: String,
        #[source]
        source: StoreError,
    },

    #[error("RemoteJSONEnvs {provider} returned invalid JSON for '{address}': {source}")]
    Decode {
        provider: ProviderKind,
        address: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The compiled template cannot receive environment variables.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("compiled template Resources is not an object")]
    ResourcesNotAnObject,

    #[error("function resource '{resource}' has a {field} that is not an object")]
    FieldNotAnObject { resource: String, field: &'static str },
}

/// Any fatal failure of a packaging run.
#[derive(Debug, Error)]
pub enum RemoteJsonEnvsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
