use futures_util::future::try_join_all;
use remote_json_envs_api::StoreResolver;
use remote_json_envs_types::{ProviderKind, RawResult, StoreItem};

use super::resolve_address;
use crate::ProcessingError;

/// Resolve every parameter concurrently; any single failure fails the batch.
pub async fn fetch_parameter_store(resolver: &dyn StoreResolver, items: &[StoreItem]) -> Result<Vec<RawResult>, ProcessingError> {
    let requests = items
        .iter()
        .map(|item| resolve_address(resolver, ProviderKind::SsmParameterStore, &item.key));
    try_join_all(requests).await
}
