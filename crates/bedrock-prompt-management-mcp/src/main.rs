//! Bedrock Prompt Management MCP Server: entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use bedrock_prompt_management::PromptManagementClient;
use bedrock_prompt_management_mcp::config::{resolve_aws_settings, DEFAULT_PORT};
use bedrock_prompt_management_mcp::protocol::ProtocolHandler;
use bedrock_prompt_management_mcp::tools::ToolRegistry;
use bedrock_prompt_management_mcp::transport::StdioTransport;
use bedrock_prompt_management_mcp::types::InitializeResult;

const BIN_NAME: &str = "bedrock-prompt-management-mcp";

#[derive(Parser)]
#[command(
    name = "bedrock-prompt-management-mcp",
    about = "MCP server for Amazon Bedrock Prompt Management",
    version
)]
struct Cli {
    /// Serve over HTTP (SSE sessions and /mcp) instead of stdio.
    #[arg(long)]
    sse: bool,

    /// Port for the HTTP transport.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Host for the HTTP transport.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// AWS region (overrides AWS_REGION).
    #[arg(long)]
    region: Option<String>,

    /// AWS profile (overrides AWS_PROFILE).
    #[arg(long)]
    profile: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Bearer token for the HTTP transport.
    /// Also reads from BEDROCK_PROMPT_MCP_TOKEN.
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print server capabilities and tool names as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   bedrock-prompt-management-mcp completions bash > ~/.local/share/bash-completion/completions/bedrock-prompt-management-mcp
    ///   bedrock-prompt-management-mcp completions zsh > ~/.zfunc/_bedrock-prompt-management-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Info) => {
            let capabilities = InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
            return Ok(());
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut std::io::stdout());
            return Ok(());
        }
        None => {}
    }

    let settings = resolve_aws_settings(cli.region.as_deref(), cli.profile.as_deref());
    tracing::info!("Bedrock Prompt Management MCP server");
    match &settings.region {
        Some(region) => tracing::info!("Region: {region}"),
        None => tracing::info!("Region: from the AWS default chain"),
    }
    if let Some(profile) = &settings.profile {
        tracing::info!("Profile: {profile}");
    }

    let client = PromptManagementClient::connect(&settings).await?;
    let handler = ProtocolHandler::new(Arc::new(client));

    if cli.sse {
        serve_http(handler, &cli.host, cli.port, cli.token).await?;
    } else {
        StdioTransport::new(handler).run().await?;
    }

    Ok(())
}

#[cfg(feature = "sse")]
async fn serve_http(
    handler: ProtocolHandler,
    host: &str,
    port: u16,
    token: Option<String>,
) -> anyhow::Result<()> {
    use bedrock_prompt_management_mcp::config::{bind_address, resolve_token};
    use bedrock_prompt_management_mcp::transport::SseTransport;

    let addr = bind_address(host, port);
    let transport = SseTransport::new(handler, resolve_token(token));
    transport.run(&addr).await?;
    Ok(())
}

#[cfg(not(feature = "sse"))]
async fn serve_http(
    _handler: ProtocolHandler,
    _host: &str,
    _port: u16,
    _token: Option<String>,
) -> anyhow::Result<()> {
    anyhow::bail!("this build has no HTTP transport; rebuild with the `sse` feature")
}
