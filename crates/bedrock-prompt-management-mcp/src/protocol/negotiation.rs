//! Initialization handshake state.

use crate::types::{Implementation, InitializeParams, InitializeResult, McpResult, MCP_VERSION};

/// What the connected client announced during `initialize`.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client_info: Option<Implementation>,
    pub requested_version: Option<String>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Record the client and answer with the server's fixed protocol version.
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, answering with {}",
                params.protocol_version,
                MCP_VERSION
            );
        }

        tracing::info!(
            "Initialize from {} v{}",
            params.client_info.name,
            params.client_info.version
        );
        self.requested_version = Some(params.protocol_version);
        self.client_info = Some(params.client_info);

        Ok(InitializeResult::default_result())
    }

    pub fn mark_initialized(&mut self) {
        if self.client_info.is_none() {
            tracing::warn!("Client sent 'initialized' before 'initialize'");
        }
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client_info.as_ref().map(|c| c.name.as_str())
    }
}
