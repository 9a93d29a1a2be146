//! MCP resource implementations.

pub mod prompts;
pub mod registry;

pub use registry::ResourceRegistry;
