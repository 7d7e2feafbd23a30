//! A filesystem-backed music collection indexer: per-band sidecar JSON
//! metadata, a collection-wide index, and a query/analytics engine exposed
//! over MCP and a CLI.

pub mod core;
pub mod mcp;
pub mod presentation;
