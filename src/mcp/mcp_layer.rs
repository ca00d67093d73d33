// MCP layer - the stdio server and its tool schemas.

#[path = "drive_server.rs"]
pub mod drive_server;
