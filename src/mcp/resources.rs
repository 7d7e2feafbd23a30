//! MCP resources (§11): read-only URIs a client can fetch without invoking a
//! tool. Grounded in the same `CollectionStore` operations the tools use.

use crate::core::api::CollectionStore;

/// Resolves one resource URI to its JSON text body, or an error message
/// suitable for `ResourceNotFound`.
pub fn read_resource(store: &CollectionStore, uri: &str) -> Result<String, String> {
    match uri {
        "collection://summary" => {
            let now = crate::mcp::server::BandKeeperServer::now();
            let index = store.collection_summary(&now).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&index).map_err(|e| e.to_string())
        }
        "collection://insights" => {
            let now = crate::mcp::server::BandKeeperServer::now();
            let insights = store.analytics(&now).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&insights).map_err(|e| e.to_string())
        }
        uri => {
            let name = uri
                .strip_prefix("band://")
                .and_then(|rest| rest.strip_suffix("/info"))
                .ok_or_else(|| format!("unrecognized resource uri '{}'", uri))?;
            let band = store.get_band(name).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&band).map_err(|e| e.to_string())
        }
    }
}
