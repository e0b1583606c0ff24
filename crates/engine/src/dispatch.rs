//! Route a validated descriptor to its fetch strategy.

use std::sync::Arc;

use remote_json_envs_api::{AwsCliConfig, AwsCliObjectStore, AwsCliParameterStore, HttpClientConfig, JsonHttpClient, StoreError, StoreResolver};
use remote_json_envs_types::{ProviderDescriptor, RawResult};
use tracing::debug;

use crate::ProcessingError;
use crate::fetch::{fetch_http, fetch_object_store, fetch_parameter_store};

/// Remote collaborators available to a packaging run.
#[derive(Clone)]
pub struct RemoteSources {
    pub parameter_store: Arc<dyn StoreResolver>,
    pub object_store: Arc<dyn StoreResolver>,
    pub http: JsonHttpClient,
}

impl RemoteSources {
    pub fn new(parameter_store: Arc<dyn StoreResolver>, object_store: Arc<dyn StoreResolver>, http: JsonHttpClient) -> Self {
        Self {
            parameter_store,
            object_store,
            http,
        }
    }

    /// Sources backed by the `aws` command line tool and a JSON HTTP client.
    pub fn aws_cli(aws: AwsCliConfig, http: &HttpClientConfig) -> Result<Self, StoreError> {
        Ok(Self::new(
            Arc::new(AwsCliParameterStore::new(aws.clone())),
            Arc::new(AwsCliObjectStore::new(aws)),
            JsonHttpClient::new(http)?,
        ))
    }
}

impl std::fmt::Debug for RemoteSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSources")
            .field("parameter_store", &self.parameter_store.name())
            .field("object_store", &self.object_store.name())
            .finish_non_exhaustive()
    }
}

/// Fetch every item of `descriptor` with the strategy its provider selects.
///
/// The returned results are aligned with the descriptor's items.
pub async fn resolve_descriptor(descriptor: &ProviderDescriptor, sources: &RemoteSources) -> Result<Vec<RawResult>, ProcessingError> {
    debug!(provider = %descriptor.kind(), items = descriptor.len(), "dispatching fetch");
    match descriptor {
        ProviderDescriptor::ParameterStore(items) => fetch_parameter_store(sources.parameter_store.as_ref(), items).await,
        ProviderDescriptor::ObjectStore(items) => fetch_object_store(sources.object_store.as_ref(), items).await,
        ProviderDescriptor::HttpRequest(items) => fetch_http(&sources.http, items).await,
    }
}
