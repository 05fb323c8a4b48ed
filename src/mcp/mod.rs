//! MCP (Model Context Protocol) server for filesearch
//!
//! Exposes the search engine as a tool for Claude Code via JSON-RPC over stdio.

mod protocol;
mod server;

pub use server::{run_until_shutdown, McpServer};
