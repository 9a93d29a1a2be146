//! Bedrock Prompt Management: signed REST access, payload builders, and a typed client adapter.

pub mod api;
pub mod client;
pub mod config;
pub mod http;
pub mod payload;
pub mod types;
pub mod variant;

pub use api::{Operation, PromptApi, Route};
pub use client::{CreatePromptRequest, PromptManagementClient, UpdatePromptRequest};
pub use config::AwsSettings;
pub use http::BedrockAgentHttp;
pub use payload::SparseMap;
pub use types::*;
pub use variant::{default_chat_turns, VariantSpec};
