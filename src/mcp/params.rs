//! Parameter structs for the nine core operations exposed as MCP tools
//! (§4.8). Record-shaped inputs travel as raw JSON so client-facing
//! validation mistakes surface through `ValidateBandMetadata`'s remediation
//! hints rather than a schema rejection at the transport boundary.

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ScanParams {}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListBandsParams {
    pub search_query: Option<String>,
    pub filter_genre: Option<String>,
    pub filter_has_metadata: Option<bool>,
    pub filter_missing_albums: Option<bool>,
    /// One of "name", "albums_count", "last_updated", "completion".
    pub sort_key: Option<String>,
    /// "asc" or "desc".
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchAlbumsParams {
    pub album_types: Option<Vec<String>>,
    pub year_min: Option<u32>,
    pub year_max: Option<u32>,
    pub decades: Option<Vec<u32>>,
    pub editions: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub band_names: Option<Vec<String>>,
    pub has_rating: Option<bool>,
    pub rating_min: Option<u8>,
    pub rating_max: Option<u8>,
    pub is_local: Option<bool>,
    pub track_count_min: Option<u32>,
    pub track_count_max: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetBandParams {
    pub band_name: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SaveBandMetadataParams {
    pub band_name: String,
    /// The band record, shaped per §6.2.
    pub record: serde_json::Value,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SaveBandAnalysisParams {
    pub band_name: String,
    /// The `analyze` object, shaped per §6.2.
    pub analysis: serde_json::Value,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SaveCollectionInsightsParams {
    pub insights: serde_json::Value,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ValidateBandMetadataParams {
    pub band_name: String,
    pub record: serde_json::Value,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyticsParams {}
