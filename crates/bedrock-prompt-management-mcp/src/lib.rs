//! Bedrock Prompt Management MCP Server: prompt templates as MCP tools.

pub mod config;
pub mod protocol;
pub mod resources;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::resolve_aws_settings;
pub use protocol::ProtocolHandler;
pub use transport::StdioTransport;
