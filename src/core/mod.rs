//! The transport-agnostic core: domain model, services, and the API
//! surface exposed to `mcp` and `presentation` (§3, §4).

pub mod api;
pub mod cancellation;
pub mod config;
pub mod domain;
pub mod errors;
pub mod locks;
pub mod logging;
pub mod services;
