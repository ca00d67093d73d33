// The transport-independent tool surface: argument checks, dispatch, the
// error taxonomy replies are built from, and the gate guarding the client.

pub mod client_gate;
pub mod document_tool;
pub mod tool_error;

pub use client_gate::ClientGate;
pub use document_tool::{DocumentTool, ToolCall};
pub use tool_error::ToolError;
