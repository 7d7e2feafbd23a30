use crate::core::api::CollectionStore;
use crate::mcp::config::Config;

use rmcp::handler::server::router::prompt::PromptRouter;
use rmcp::model::{
    AnnotateAble, ListResourcesResult, PaginatedRequestParams, RawResource, ReadResourceRequestParams,
    ReadResourceResult, Resource, ResourceContents,
};
use rmcp::service::RequestContext;
use rmcp::{
    ErrorData as McpError, RoleServer,
    handler::server::{ServerHandler, tool::ToolRouter},
    model::{
        GetPromptRequestParams, GetPromptResult, Implementation, ListPromptsResult,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    prompt_handler, tool_handler,
};

/// `band://{name}/info`, `collection://summary`, `collection://insights`
/// (§11): the three read-only resources this server exposes alongside its
/// tools.
const RESOURCE_COLLECTION_SUMMARY: &str = "collection://summary";
const RESOURCE_COLLECTION_INSIGHTS: &str = "collection://insights";

#[derive(Clone)]
pub struct BandKeeperServer {
    pub(crate) tool_router: ToolRouter<Self>,
    pub(crate) prompt_router: PromptRouter<Self>,
    pub(crate) config: Config,
    pub(crate) store: std::sync::Arc<CollectionStore>,
}

impl BandKeeperServer {
    pub fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for BandKeeperServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "band-keeper".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Music collection indexer - band metadata, collection index, and analytics"
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut resources: Vec<Resource> = vec![
            RawResource::new(RESOURCE_COLLECTION_SUMMARY, "Collection summary")
                .no_annotation(),
            RawResource::new(RESOURCE_COLLECTION_INSIGHTS, "Collection insights")
                .no_annotation(),
        ];

        if let Ok(names) = self.store.root().read_dir().map(|rd| {
            rd.filter_map(|e| e.ok())
                .filter(|e| e.path().is_dir())
                .filter_map(|e| e.file_name().into_string().ok())
                .collect::<Vec<_>>()
        }) {
            for name in names {
                if !self.store.band_exists(&name) {
                    continue;
                }
                resources.push(
                    RawResource::new(format!("band://{}/info", name), format!("{} info", name))
                        .no_annotation(),
                );
            }
        }

        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = crate::mcp::resources::read_resource(&self.store, &request.uri)
            .map_err(|e| McpError::resource_not_found(e, None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
