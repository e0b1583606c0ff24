use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider family, the first key under the `provider` configuration block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Aws,
    Api,
}

impl ProviderFamily {
    pub const ALL: [ProviderFamily; 2] = [ProviderFamily::Aws, ProviderFamily::Api];

    pub fn name(self) -> &'static str {
        match self {
            ProviderFamily::Aws => "aws",
            ProviderFamily::Api => "api",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.name() == name)
    }

    /// Concrete providers accepted under this family.
    pub fn providers(self) -> &'static [ProviderKind] {
        match self {
            ProviderFamily::Aws => &[ProviderKind::SsmParameterStore, ProviderKind::S3],
            ProviderFamily::Api => &[ProviderKind::HttpRequest],
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete remote provider selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "SSMParameterStore")]
    SsmParameterStore,
    #[serde(rename = "S3")]
    S3,
    #[serde(rename = "HTTPRequest")]
    HttpRequest,
}

impl ProviderKind {
    /// Configuration name of the provider (`SSMParameterStore`, `S3`, `HTTPRequest`).
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::SsmParameterStore => "SSMParameterStore",
            ProviderKind::S3 => "S3",
            ProviderKind::HttpRequest => "HTTPRequest",
        }
    }

    pub fn family(self) -> ProviderFamily {
        match self {
            ProviderKind::SsmParameterStore | ProviderKind::S3 => ProviderFamily::Aws,
            ProviderKind::HttpRequest => ProviderFamily::Api,
        }
    }

    /// Name of the per-item field that carries the remote address.
    pub fn address_field(self) -> &'static str {
        match self {
            ProviderKind::SsmParameterStore | ProviderKind::S3 => "key",
            ProviderKind::HttpRequest => "URL",
        }
    }

    /// Look up a concrete provider by configuration name within a family.
    pub fn from_name(family: ProviderFamily, name: &str) -> Option<Self> {
        family.providers().iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
