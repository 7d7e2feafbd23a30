//! User-facing surfaces built on top of `core` (§4.8).

pub mod cli;
