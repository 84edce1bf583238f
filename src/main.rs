//! file-search - manage and query Gemini File Search stores from the shell

use clap::{CommandFactory, Parser};
use clap_complete::CompleteEnv;

mod cache;
mod cli;
mod client;
mod config;
mod directory;
mod error;
mod mcp;
mod models;
mod output;
mod resolve;

use cli::file::UploadOptions;
use cli::{
    Cli, Commands, DocumentCommands, FileCommands, GlobalOptions, OperationCommands,
    StoreCommands,
};
use error::Result;

fn main() {
    // Handles COMPLETE=<shell> and exits. This runs before the async runtime
    // starts because completers build their own.
    CompleteEnv::with_factory(Cli::command).complete();

    start();
}

#[tokio::main]
async fn start() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Logs go to stderr. `--debug` turns on this crate's debug output;
/// `RUST_LOG` overrides both.
fn init_logging(debug: bool) {
    let default_filter = if debug { "warn,file_search=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Store(cmd) => match cmd {
            StoreCommands::List => cli::store::list(&opts).await,
            StoreCommands::Get { name } => cli::store::get(&opts, &name).await,
            StoreCommands::Create { display_name } => {
                cli::store::create(&opts, &display_name).await
            }
            StoreCommands::Delete { name, force } => {
                cli::store::delete(&opts, &name, force).await
            }
            StoreCommands::ImportFile { file, store } => {
                cli::store::import_file(&opts, &file, &store).await
            }
        },
        Commands::File(cmd) => match cmd {
            FileCommands::List => cli::file::list(&opts).await,
            FileCommands::Get { name } => cli::file::get(&opts, &name).await,
            FileCommands::Delete { name } => cli::file::delete(&opts, &name).await,
            FileCommands::Upload {
                path,
                store,
                name,
                mime_type,
                chunk_size,
                chunk_overlap,
                metadata,
            } => {
                let upload_opts = UploadOptions {
                    display_name: name,
                    mime_type,
                    chunk_size,
                    chunk_overlap,
                    metadata,
                };
                cli::file::upload(&opts, &path, &store, &upload_opts).await
            }
        },
        Commands::Document(cmd) => match cmd {
            DocumentCommands::List { store } => cli::document::list(&opts, &store).await,
            DocumentCommands::Get { name, store } => {
                cli::document::get(&opts, &name, &store).await
            }
            DocumentCommands::Delete { name, store, force } => {
                cli::document::delete(&opts, &name, &store, force).await
            }
        },
        Commands::Query {
            text,
            store,
            model,
            metadata_filter,
        } => {
            cli::query::run(
                &opts,
                &text,
                &store,
                model.as_deref(),
                metadata_filter.as_deref(),
            )
            .await
        }
        Commands::Operation(OperationCommands::Get { name, op_type }) => {
            cli::operation::get(&opts, &name, op_type).await
        }
        Commands::Mcp { tools } => cli::mcp::run(&opts, tools.as_deref()).await,
        Commands::Version => {
            println!("file-search version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "file-search",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
