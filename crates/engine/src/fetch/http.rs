use futures_util::future::try_join_all;
use remote_json_envs_api::JsonHttpClient;
use remote_json_envs_types::{HttpItem, ProviderKind, RawResult};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ProcessingError;

/// Request every endpoint concurrently.
///
/// Transport failures abort the batch. A non-2xx status or a body that is not
/// JSON makes that single item "not found".
pub async fn fetch_http(client: &JsonHttpClient, items: &[HttpItem]) -> Result<Vec<RawResult>, ProcessingError> {
    try_join_all(items.iter().map(|item| fetch_item(client, item))).await
}

async fn fetch_item(client: &JsonHttpClient, item: &HttpItem) -> Result<RawResult, ProcessingError> {
    debug!(url = %item.url, method = %item.effective_method(), "requesting item");
    let response = client.send(item).await.map_err(|source| ProcessingError::Resolve {
        provider: ProviderKind::HttpRequest,
        address: item.url.clone(),
        source,
    })?;

    if !response.is_success() {
        warn!(url = %item.url, status = response.status, "request returned a non-success status; item treated as not found");
        return Ok(RawResult::missing());
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => Ok(RawResult::found(value)),
        Err(error) => {
            warn!(url = %item.url, %error, "response body is not JSON; item treated as not found");
            Ok(RawResult::missing())
        }
    }
}
