//! pm-tools stdio host - main entry point.
//!
//! Loads configuration (file, then environment, then flags), builds the tool
//! registry over an HTTP transport, and serves JSON-RPC on stdin/stdout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pm_tools_core::host::StdioHost;
use pm_tools_core::tools::{catalog_file_schema, ToolRegistryBuilder};
use pm_tools_core::transport::HttpTransport;
use pm_tools_core::Config;

#[derive(Debug, Parser)]
#[command(name = "pm-tools-mcp")]
#[command(about = "Project-management backend exposed as JSON-RPC tools over stdio", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "PM_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Additional tool catalog file (JSON array of tool specs)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Serve only the tools from --catalog
    #[arg(long)]
    no_builtin: bool,

    /// Print the tool list and exit
    #[arg(long)]
    list_tools: bool,

    /// Print the JSON Schema of the catalog file format and exit
    #[arg(long)]
    print_catalog_schema: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    config.apply_env()?;
    if let Some(base_url) = cli.base_url {
        config.backend.base_url = base_url;
    }
    if let Some(catalog) = cli.catalog {
        config.tools.catalog_path = Some(catalog);
    }
    if cli.no_builtin {
        config.tools.include_builtin = false;
    }

    pm_tools_core::observability::init_tracing(&config.observability);
    config.validate()?;

    if cli.print_catalog_schema {
        println!("{}", serde_json::to_string_pretty(&catalog_file_schema())?);
        return Ok(());
    }

    let transport = HttpTransport::new(&config.backend)?;
    let registry = ToolRegistryBuilder::from_config(&config.tools)?.build(Arc::new(transport))?;

    if cli.list_tools {
        println!("{}", registry.generate_prompt(None));
        return Ok(());
    }

    tracing::info!(
        "pm-tools host starting: {} tools, backend {}",
        registry.len(),
        config.backend.base_url
    );

    let host = Arc::new(StdioHost::new(Arc::new(registry), config.host.clone()));
    let signal_host = host.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            signal_host.shutdown();
        }
    });

    host.serve().await?;
    Ok(())
}
