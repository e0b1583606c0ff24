//! Fetch strategies, one per provider.
//!
//! Every strategy issues one request per item, all of them concurrently, and
//! waits for the whole batch. Results are returned in item order regardless of
//! completion order:
//!
//! - `parameter_store`: all-or-nothing, the first failure aborts the batch
//! - `object_store`: all-or-nothing, and every body is decoded as JSON
//! - `http`: transport failures abort the batch; a non-2xx status or a non-JSON
//!   body degrades that one item to "not found"

mod http;
mod object_store;
mod parameter_store;

pub use http::fetch_http;
pub use object_store::fetch_object_store;
pub use parameter_store::fetch_parameter_store;

use remote_json_envs_api::StoreResolver;
use remote_json_envs_types::{ProviderKind, RawResult};
use tracing::debug;

use crate::ProcessingError;

async fn resolve_address(resolver: &dyn StoreResolver, provider: ProviderKind, address: &str) -> Result<RawResult, ProcessingError> {
    debug!(%provider, resolver = resolver.name(), address, "resolving item");
    let result = resolver.resolve(address).await.map_err(|source| ProcessingError::Resolve {
        provider,
        address: address.to_string(),
        source,
    })?;
    debug!(%provider, address, found = !result.is_missing(), "resolved item");
    Ok(result)
}
