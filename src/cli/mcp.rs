//! MCP server command

use std::sync::Arc;

use log::{debug, info};
use rmcp::ServiceExt;
use rmcp::transport::stdio;

use crate::cli::{CommandContext, GlobalOptions};
use crate::client::GeminiApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::mcp::{FileSearchServer, ToolGroup, parse_tool_list, tool_groups};

/// Serve MCP tools on stdio until the client disconnects.
///
/// Runs without an API key too: identifier arguments then fail per call
/// and name arguments report the missing key.
pub async fn run(opts: &GlobalOptions, tools: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let groups = enabled_groups(tools, &ctx.config)?;
    info!(
        "Starting MCP server with tool groups: {}",
        groups
            .iter()
            .map(ToolGroup::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let client: Arc<dyn GeminiApi> = ctx.client.clone();
    let server = FileSearchServer::new(
        client,
        ctx.cache.clone(),
        ctx.config.default_model(),
        &groups,
    );

    let service = server
        .serve(stdio())
        .await
        .map_err(|e| Error::Other(format!("MCP server failed to start: {}", e)))?;
    let reason = service
        .waiting()
        .await
        .map_err(|e| Error::Other(format!("MCP server stopped: {}", e)))?;
    debug!("MCP server finished: {:?}", reason);
    Ok(())
}

/// Groups from `--mcp-tools`/`MCP_TOOLS`, else the config's `mcp_tools`.
fn enabled_groups(flag: Option<&str>, config: &Config) -> Result<Vec<ToolGroup>> {
    let value = flag
        .filter(|v| !v.trim().is_empty())
        .or(config.mcp_tools.as_deref());
    let names = parse_tool_list(value);
    let groups = tool_groups(&names);
    if groups.is_empty() {
        return Err(Error::Other(format!(
            "no known MCP tool groups in '{}' (expected query, list, import, upload, manage or all)",
            names.join(",")
        )));
    }
    Ok(groups)
}
