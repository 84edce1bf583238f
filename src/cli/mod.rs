//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
use clap_complete::engine::ArgValueCandidates;
pub use clap_complete::Shell;

use crate::client::models::OperationType;
use completions::{
    document_name_candidates, file_name_candidates, model_name_candidates, store_name_candidates,
};

pub mod args;
pub mod completions;
pub mod context;
pub mod document;
pub mod file;
pub mod mcp;
pub mod operation;
pub mod query;
pub mod store;

pub use args::{GlobalOptions, OptionalStoreArgs, OutputFormat, StoreArgs};
pub use context::CommandContext;

/// file-search - manage and query Gemini File Search stores
#[derive(Parser, Debug)]
#[command(name = "file-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Gemini API key
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Environment variable to read the API key from
    #[arg(long, global = true, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// Output format (text, table, json)
    #[arg(
        long,
        global = true,
        env = "FILE_SEARCH_FORMAT",
        default_value = "text",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location (default ~/.file-search.yaml)
    #[arg(long, global = true, env = "FILE_SEARCH_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "FILE_SEARCH_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage File Search stores
    #[command(subcommand)]
    Store(StoreCommands),

    /// Manage files in the Files API
    #[command(subcommand)]
    File(FileCommands),

    /// Manage documents inside a store
    #[command(subcommand, visible_alias = "doc", alias = "docs")]
    Document(DocumentCommands),

    /// Ask a question, optionally grounded on a store
    #[command(visible_alias = "q")]
    Query {
        /// Question text (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[command(flatten)]
        store: OptionalStoreArgs,

        /// Model name or id (default from config, else gemini-2.5-flash)
        #[arg(long, add = ArgValueCandidates::new(model_name_candidates))]
        model: Option<String>,

        /// Metadata filter expression
        #[arg(long)]
        metadata_filter: Option<String>,
    },

    /// Inspect long-running operations
    #[command(subcommand, visible_alias = "op", alias = "ops")]
    Operation(OperationCommands),

    /// Serve store, file and query tools to MCP clients over stdio
    Mcp {
        /// Tool groups to enable, comma-separated: query, list, import,
        /// upload, manage, or all (default: query)
        #[arg(long = "mcp-tools", env = "MCP_TOOLS", value_name = "TOOLS")]
        tools: Option<String>,
    },

    /// Display version information
    Version,

    /// Generate shell completions (static)
    #[command(after_help = "\
Static completions (subcommands/flags only):
  bash:   file-search completion bash > /etc/bash_completion.d/file-search
  zsh:    file-search completion zsh > \"${fpath[1]}/_file-search\"
  fish:   file-search completion fish > ~/.config/fish/completions/file-search.fish

Dynamic completions (includes store, file, document and model names):
  bash:   echo 'source <(COMPLETE=bash file-search)' >> ~/.bashrc
  zsh:    echo 'source <(COMPLETE=zsh file-search)' >> ~/.zshrc
  fish:   echo 'COMPLETE=fish file-search | source' >> ~/.config/fish/config.fish

Note: Dynamic completions read the Gemini API when you press TAB and need
an API key. Set COMPLETION_ENABLED=false to turn them off.")]
    Completion {
        /// Shell to generate completions for (static only)
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Store management subcommands
#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// List all stores
    #[command(visible_alias = "ls")]
    List,

    /// Show store details
    Get {
        /// Store display name or id
        #[arg(add = ArgValueCandidates::new(store_name_candidates))]
        name: String,
    },

    /// Create a store
    #[command(visible_alias = "new", alias = "add")]
    Create {
        /// Display name for the new store
        display_name: String,
    },

    /// Delete a store
    #[command(visible_alias = "rm", alias = "del")]
    Delete {
        /// Store display name or id
        #[arg(add = ArgValueCandidates::new(store_name_candidates))]
        name: String,

        /// Delete even if the store still holds documents
        #[arg(long)]
        force: bool,
    },

    /// Import a file from the Files API into a store
    ImportFile {
        /// File display name or id
        #[arg(add = ArgValueCandidates::new(file_name_candidates))]
        file: String,

        #[command(flatten)]
        store: StoreArgs,
    },
}

/// File management subcommands
#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// List uploaded files
    #[command(visible_alias = "ls")]
    List,

    /// Show file details
    Get {
        /// File display name or id
        #[arg(add = ArgValueCandidates::new(file_name_candidates))]
        name: String,
    },

    /// Delete a file
    #[command(visible_alias = "rm", alias = "del")]
    Delete {
        /// File display name or id
        #[arg(add = ArgValueCandidates::new(file_name_candidates))]
        name: String,
    },

    /// Upload a file, and import it into a store when one is given
    Upload {
        /// Local path of the file to upload
        path: std::path::PathBuf,

        #[command(flatten)]
        store: OptionalStoreArgs,

        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime_type: Option<String>,

        /// Max tokens per chunk (store uploads)
        #[arg(long, default_value_t = 0)]
        chunk_size: u32,

        /// Overlap tokens between chunks (store uploads)
        #[arg(long, default_value_t = 0)]
        chunk_overlap: u32,

        /// Custom metadata as key=value (repeatable, store uploads)
        #[arg(long = "metadata", value_name = "KEY=VALUE")]
        metadata: Vec<String>,
    },
}

/// Document management subcommands
#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// List documents in a store
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show document details
    Get {
        /// Document display name (needs --store or --store-id) or id
        #[arg(add = ArgValueCandidates::new(document_name_candidates))]
        name: String,

        #[command(flatten)]
        store: OptionalStoreArgs,
    },

    /// Delete a document
    #[command(visible_alias = "rm", alias = "del")]
    Delete {
        /// Document display name (needs --store or --store-id) or id
        #[arg(add = ArgValueCandidates::new(document_name_candidates))]
        name: String,

        #[command(flatten)]
        store: OptionalStoreArgs,

        /// Delete even if the document still has chunks
        #[arg(long)]
        force: bool,
    },
}

/// Operation subcommands
#[derive(Subcommand, Debug)]
pub enum OperationCommands {
    /// Show the status of an import or upload operation
    Get {
        /// Operation name (fileSearchStores/.../operations/...)
        name: String,

        /// Operation type: import or upload (detected from the name if omitted)
        #[arg(long = "type", value_name = "TYPE")]
        op_type: Option<OperationType>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mcp_tools() {
        let cli =
            Cli::try_parse_from(["file-search", "mcp", "--mcp-tools", "query,list"]).unwrap();
        match cli.command {
            Commands::Mcp { tools } => assert_eq!(tools.as_deref(), Some("query,list")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_document_get_with_store() {
        let cli = Cli::try_parse_from([
            "file-search",
            "doc",
            "get",
            "guide.pdf",
            "--store",
            "Manuals",
        ])
        .unwrap();

        match cli.command {
            Commands::Document(DocumentCommands::Get { name, store }) => {
                assert_eq!(name, "guide.pdf");
                assert_eq!(store.store.as_deref(), Some("Manuals"));
                assert!(store.store_id.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_store_and_store_id_conflict() {
        let result = Cli::try_parse_from([
            "file-search",
            "document",
            "list",
            "--store",
            "Manuals",
            "--store-id",
            "fileSearchStores/abc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_import_file_requires_store() {
        let result = Cli::try_parse_from(["file-search", "store", "import-file", "notes.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_query_joins_words() {
        let cli = Cli::try_parse_from(["file-search", "q", "how", "do", "I", "reset"]).unwrap();
        match cli.command {
            Commands::Query { text, model, .. } => {
                assert_eq!(text.join(" "), "how do I reset");
                assert!(model.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_operation_type_flag() {
        let cli = Cli::try_parse_from([
            "file-search",
            "op",
            "get",
            "fileSearchStores/a/operations/o",
            "--type",
            "upload",
        ])
        .unwrap();
        match cli.command {
            Commands::Operation(OperationCommands::Get { op_type, .. }) => {
                assert_eq!(op_type, Some(OperationType::Upload));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_upload_metadata_is_repeatable() {
        let cli = Cli::try_parse_from([
            "file-search",
            "file",
            "upload",
            "notes.txt",
            "--metadata",
            "author=Ada",
            "--metadata",
            "year=1843",
        ])
        .unwrap();
        match cli.command {
            Commands::File(FileCommands::Upload { metadata, .. }) => {
                assert_eq!(metadata, vec!["author=Ada", "year=1843"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["file-search", "store", "list", "--format", "json", "-q"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
    }
}
