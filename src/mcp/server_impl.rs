use crate::core::config::DEFAULT_PAGE_SIZE;
use crate::core::services::query::{
    AlbumSearchFilters, BandFilters, Pagination, SortKey, SortOrder,
};
use crate::mcp::call_tool_result::CallToolResultExt;
use crate::mcp::config::Config;
use crate::mcp::params::{
    AnalyticsParams, GetBandParams, ListBandsParams, SaveBandAnalysisParams,
    SaveBandMetadataParams, SaveCollectionInsightsParams, ScanParams, SearchAlbumsParams,
    ValidateBandMetadataParams,
};
use crate::mcp::prompt_handler_requests::{
    AnalyzeBandParams, CompareBandsParams, FetchBandInfoParams,
};
use crate::mcp::prompts::{
    analyze_band_prompt, collection_insights_prompt, compare_bands_prompt, fetch_band_info_prompt,
};
use crate::mcp::server::BandKeeperServer;
use rmcp::model::PromptMessageContent;
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, GetPromptResult, PromptMessage, PromptMessageRole},
    prompt, prompt_router, tool, tool_router,
};

fn user_prompt(text: String) -> GetPromptResult {
    GetPromptResult {
        description: None,
        messages: vec![PromptMessage {
            role: PromptMessageRole::User,
            content: PromptMessageContent::Text { text },
        }],
    }
}

fn parse_sort_key(raw: Option<&str>) -> SortKey {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("albums_count") => SortKey::AlbumsCount,
        Some("last_updated") => SortKey::LastUpdated,
        Some("completion") => SortKey::Completion,
        _ => SortKey::Name,
    }
}

fn parse_sort_order(raw: Option<&str>) -> SortOrder {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("desc") => SortOrder::Descending,
        _ => SortOrder::Ascending,
    }
}

fn album_types_from_strings(raw: &[String]) -> Vec<crate::core::domain::AlbumType> {
    raw.iter()
        .map(|s| crate::core::domain::AlbumType::parse(s))
        .collect()
}

#[tool_router]
#[prompt_router]
impl BandKeeperServer {
    pub fn new(config: Config) -> Self {
        let store = std::sync::Arc::new(crate::core::api::CollectionStore::new(
            config.music_root_path.clone(),
        ));
        Self {
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
            config,
            store,
        }
    }

    #[tool(description = "Scan the music root for bands/albums and apply the delta")]
    async fn scan(&self, _params: Parameters<ScanParams>) -> Result<CallToolResult, McpError> {
        let now = BandKeeperServer::now();
        match self.store.scan(&now, &crate::core::cancellation::CancellationToken::new()) {
            Ok(report) => match serde_json::to_string_pretty(&report) {
                Ok(s) => Ok(CallToolResult::success_text(s)),
                Err(e) => Ok(CallToolResult::error_text(e.to_string())),
            },
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "List bands with optional filters, sort, and pagination")]
    async fn list_bands(
        &self,
        params: Parameters<ListBandsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let now = BandKeeperServer::now();
        let filters = BandFilters {
            search_query: p.search_query,
            filter_genre: p.filter_genre,
            filter_has_metadata: p.filter_has_metadata,
            filter_missing_albums: p.filter_missing_albums,
        };
        let pagination = Pagination {
            page: p.page.unwrap_or(1),
            page_size: p.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        };
        match self.store.list_bands(
            &filters,
            parse_sort_key(p.sort_key.as_deref()),
            parse_sort_order(p.sort_order.as_deref()),
            pagination,
            &now,
        ) {
            Ok(result) => match serde_json::to_string_pretty(&SerializablePagedBandList::from(result)) {
                Ok(s) => Ok(CallToolResult::success_text(s)),
                Err(e) => Ok(CallToolResult::error_text(e.to_string())),
            },
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Search albums across the collection by type, year, edition, genre, rating, or locality")]
    async fn search_albums(
        &self,
        params: Parameters<SearchAlbumsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let now = BandKeeperServer::now();
        let filters = AlbumSearchFilters {
            album_types: p.album_types.as_deref().map(album_types_from_strings),
            year_min: p.year_min,
            year_max: p.year_max,
            decades: p.decades,
            editions: p.editions,
            genres: p.genres,
            band_names: p.band_names,
            has_rating: p.has_rating,
            rating_min: p.rating_min,
            rating_max: p.rating_max,
            is_local: p.is_local,
            track_count_min: p.track_count_min,
            track_count_max: p.track_count_max,
        };
        match self.store.search_albums(&filters, &now) {
            Ok(views) => match serde_json::to_string_pretty(&views) {
                Ok(s) => Ok(CallToolResult::success_text(s)),
                Err(e) => Ok(CallToolResult::error_text(e.to_string())),
            },
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Fetch a single band's full record")]
    async fn get_band(&self, params: Parameters<GetBandParams>) -> Result<CallToolResult, McpError> {
        match self.store.get_band(&params.0.band_name) {
            Ok(band) => match serde_json::to_string_pretty(&band) {
                Ok(s) => Ok(CallToolResult::success_text(s)),
                Err(e) => Ok(CallToolResult::error_text(e.to_string())),
            },
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Save a band's metadata record, validating it first")]
    async fn save_band_metadata(
        &self,
        params: Parameters<SaveBandMetadataParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let band: crate::core::domain::Band = match serde_json::from_value(p.record) {
            Ok(b) => b,
            Err(e) => return Ok(CallToolResult::error_text(format!("invalid record: {e}"))),
        };
        let now = BandKeeperServer::now();
        match self.store.save_band_metadata(&p.band_name, band, &now) {
            Ok(report) => Ok(CallToolResult::success_text(format!(
                "saved '{}' at {} (checksum {})",
                p.band_name, report.last_updated, report.checksum
            ))),
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Save per-band analysis (review, rating, similar bands, per-album ratings)")]
    async fn save_band_analysis(
        &self,
        params: Parameters<SaveBandAnalysisParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let analysis: crate::core::domain::BandAnalysis = match serde_json::from_value(p.analysis) {
            Ok(a) => a,
            Err(e) => return Ok(CallToolResult::error_text(format!("invalid analysis: {e}"))),
        };
        let now = BandKeeperServer::now();
        match self.store.save_band_analysis(&p.band_name, analysis, &now) {
            Ok(report) => Ok(CallToolResult::success_text(format!(
                "saved analysis for '{}' at {}",
                p.band_name, report.last_updated
            ))),
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Write the collection-wide insights sidecar file")]
    async fn save_collection_insights(
        &self,
        params: Parameters<SaveCollectionInsightsParams>,
    ) -> Result<CallToolResult, McpError> {
        let insights: crate::core::domain::CollectionInsights =
            match serde_json::from_value(params.0.insights) {
                Ok(i) => i,
                Err(e) => return Ok(CallToolResult::error_text(format!("invalid insights: {e}"))),
            };
        match self.store.save_collection_insights(&insights) {
            Ok(report) => Ok(CallToolResult::success_text(format!(
                "saved collection insights (checksum {})",
                report.checksum
            ))),
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Dry-run validate a band record without writing anything")]
    async fn validate_band_metadata(
        &self,
        params: Parameters<ValidateBandMetadataParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let report = self.store.validate_band_metadata(&p.band_name, &p.record);
        match serde_json::to_string_pretty(&SerializableValidationReport::from(report)) {
            Ok(s) => Ok(CallToolResult::success_text(s)),
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[tool(description = "Compute collection-wide analytics (maturity, health score, recommendations)")]
    async fn analytics(&self, _params: Parameters<AnalyticsParams>) -> Result<CallToolResult, McpError> {
        let now = BandKeeperServer::now();
        match self.store.analytics(&now) {
            Ok(insights) => match serde_json::to_string_pretty(&insights) {
                Ok(s) => Ok(CallToolResult::success_text(s)),
                Err(e) => Ok(CallToolResult::error_text(e.to_string())),
            },
            Err(e) => Ok(CallToolResult::error_text(e.to_string())),
        }
    }

    #[prompt(
        name = "analyze-band",
        description = "Summarize one band's discography completeness and metadata coverage"
    )]
    async fn analyze_band_prompt_handler(
        &self,
        params: Parameters<AnalyzeBandParams>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(user_prompt(analyze_band_prompt(&params.0.band_name)))
    }

    #[prompt(
        name = "compare-bands",
        description = "Compare two bands' collection completeness and analysis coverage"
    )]
    async fn compare_bands_prompt_handler(
        &self,
        params: Parameters<CompareBandsParams>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(user_prompt(compare_bands_prompt(
            &params.0.band_a,
            &params.0.band_b,
        )))
    }

    #[prompt(
        name = "fetch-band-info",
        description = "Present a band's metadata from its info resource"
    )]
    async fn fetch_band_info_prompt_handler(
        &self,
        params: Parameters<FetchBandInfoParams>,
    ) -> Result<GetPromptResult, McpError> {
        Ok(user_prompt(fetch_band_info_prompt(&params.0.band_name)))
    }

    #[prompt(
        name = "collection-insights",
        description = "Produce a written report from the collection's analytics"
    )]
    async fn collection_insights_prompt_handler(&self) -> Result<GetPromptResult, McpError> {
        Ok(user_prompt(collection_insights_prompt()))
    }
}

/// `PagedBandList` derives no `Serialize` (it is an internal query-engine
/// type); this mirrors its fields for the MCP response body.
#[derive(serde::Serialize)]
struct SerializablePagedBandList {
    bands: Vec<crate::core::domain::BandSummary>,
    total: u32,
    page: u32,
    page_size: u32,
    total_pages: u32,
    has_previous: bool,
    has_next: bool,
}

impl From<crate::core::services::query::PagedBandList> for SerializablePagedBandList {
    fn from(p: crate::core::services::query::PagedBandList) -> Self {
        SerializablePagedBandList {
            bands: p.bands,
            total: p.total,
            page: p.page,
            page_size: p.page_size,
            total_pages: p.total_pages,
            has_previous: p.has_previous,
            has_next: p.has_next,
        }
    }
}

#[derive(serde::Serialize)]
struct SerializableValidationReport {
    valid: bool,
    issues: Vec<crate::core::services::validation::ValidationIssue>,
    schema_valid: bool,
    missing_required_fields: Vec<String>,
    unexpected_fields: Vec<String>,
}

impl From<crate::core::services::validation::ValidationReport> for SerializableValidationReport {
    fn from(r: crate::core::services::validation::ValidationReport) -> Self {
        SerializableValidationReport {
            valid: r.valid,
            issues: r.issues,
            schema_valid: r.schema_valid,
            missing_required_fields: r.missing_required_fields,
            unexpected_fields: r.unexpected_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_server(root: &std::path::Path) -> BandKeeperServer {
        BandKeeperServer::new(Config {
            music_root_path: root.to_path_buf(),
            cache_duration_days: 30,
            log_level: "info".to_string(),
        })
    }

    #[tokio::test]
    async fn scan_tool_on_empty_root_reports_zero() {
        let dir = tempdir().unwrap();
        let server = test_server(dir.path());
        let result = server.scan(Parameters(ScanParams {})).await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn get_band_tool_reports_not_found_as_error_content() {
        let dir = tempdir().unwrap();
        let server = test_server(dir.path());
        let result = server
            .get_band(Parameters(GetBandParams {
                band_name: "Nonexistent".to_string(),
            }))
            .await
            .unwrap();
        assert!(result.is_error.unwrap_or(false));
    }
}
