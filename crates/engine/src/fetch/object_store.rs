use futures_util::future::try_join_all;
use remote_json_envs_api::StoreResolver;
use remote_json_envs_types::{ProviderKind, RawResult, StoreItem};
use serde_json::Value;

use super::resolve_address;
use crate::ProcessingError;

/// Resolve every object concurrently and decode each body as JSON.
///
/// Any single fetch or decode failure fails the batch.
pub async fn fetch_object_store(resolver: &dyn StoreResolver, items: &[StoreItem]) -> Result<Vec<RawResult>, ProcessingError> {
    let requests = items.iter().map(|item| resolve_address(resolver, ProviderKind::S3, &item.key));
    let results = try_join_all(requests).await?;

    results
        .into_iter()
        .zip(items)
        .map(|(result, item)| decode_object(result, &item.key))
        .collect()
}

fn decode_object(result: RawResult, address: &str) -> Result<RawResult, ProcessingError> {
    match result.value {
        Some(Value::String(body)) => serde_json::from_str(&body)
            .map(RawResult::found)
            .map_err(|source| ProcessingError::Decode {
                provider: ProviderKind::S3,
                address: address.to_string(),
                source,
            }),
        // Already structured or missing.
        other => Ok(RawResult::from(other)),
    }
}
