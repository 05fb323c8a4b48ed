//! Core search primitives shared by the CLI and the MCP server.

pub mod search;
