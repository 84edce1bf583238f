//! MCP (Model Context Protocol) server mode
//!
//! Serves store, file and query operations as tool calls over stdio. Every
//! request shares one [`ResolutionCache`](crate::cache::ResolutionCache), so
//! display names looked up by one tool call are reused by the next.
//!
//! Tools are enabled in groups, chosen with `--mcp-tools`, `MCP_TOOLS` or
//! the `mcp_tools` config key as a comma-separated list.

pub mod server;

use std::fmt;

use log::warn;

pub use server::FileSearchServer;

/// Group enabled when nothing is configured
pub const DEFAULT_TOOL_GROUP: &str = "query";

/// Name that enables every group
pub const ALL_TOOL_GROUPS: &str = "all";

/// A named set of MCP tools that is switched on or off as a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolGroup {
    Query,
    List,
    Import,
    Upload,
    Manage,
}

impl ToolGroup {
    pub const ALL: [ToolGroup; 5] = [
        ToolGroup::Query,
        ToolGroup::List,
        ToolGroup::Import,
        ToolGroup::Upload,
        ToolGroup::Manage,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "query" => Some(ToolGroup::Query),
            "list" => Some(ToolGroup::List),
            "import" => Some(ToolGroup::Import),
            "upload" => Some(ToolGroup::Upload),
            "manage" => Some(ToolGroup::Manage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolGroup::Query => "query",
            ToolGroup::List => "list",
            ToolGroup::Import => "import",
            ToolGroup::Upload => "upload",
            ToolGroup::Manage => "manage",
        }
    }

    /// Tool names served by this group
    pub fn tools(&self) -> &'static [&'static str] {
        match self {
            ToolGroup::Query => &["query"],
            ToolGroup::List => &["list_stores", "list_files", "list_documents"],
            ToolGroup::Import => &["import_file"],
            ToolGroup::Upload => &["upload_file"],
            ToolGroup::Manage => &[
                "create_store",
                "delete_store",
                "delete_file",
                "delete_document",
            ],
        }
    }
}

impl fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a comma-separated tool list, trimming each entry.
///
/// Unset, empty, or all-blank input means the default `query` group.
pub fn parse_tool_list(value: Option<&str>) -> Vec<String> {
    let tools: Vec<String> = value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tool| !tool.is_empty())
        .map(str::to_string)
        .collect();

    if tools.is_empty() {
        vec![DEFAULT_TOOL_GROUP.to_string()]
    } else {
        tools
    }
}

/// Groups named by `names`, in first-mention order. `all` expands to every
/// group; unknown names are logged and skipped.
pub fn tool_groups(names: &[String]) -> Vec<ToolGroup> {
    let mut groups = Vec::new();
    for name in names {
        let named: Vec<ToolGroup> = if name == ALL_TOOL_GROUPS {
            ToolGroup::ALL.to_vec()
        } else if let Some(group) = ToolGroup::from_name(name) {
            vec![group]
        } else {
            warn!(
                "Unknown MCP tool group '{}' (expected query, list, import, upload, manage or all)",
                name
            );
            continue;
        };
        for group in named {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
    }
    groups
}
