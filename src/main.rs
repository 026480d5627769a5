//! drive_fetch CLI - fetch files from publicly shared Google Drive folders.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drive_fetch::models::format_size;
use drive_fetch::server::{router, AppState};
use drive_fetch::{extract_folder_id, PublicDriveClient};

/// CLI tool for fetching files from publicly shared Google Drive folders.
#[derive(Parser)]
#[command(name = "drive_fetch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory downloaded files are saved under.
    #[arg(long, env = "DRIVE_FETCH_DOWNLOAD_DIR", default_value = "./downloads")]
    download_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files on a folder's public browse page.
    List {
        /// Folder URL or ID.
        folder: String,
    },

    /// Download every file in a folder and print a run summary.
    Fetch {
        /// Folder URL or ID.
        folder: String,
    },

    /// Download a single file by ID.
    Download {
        /// File ID.
        file_id: String,

        /// File name to save as (defaults to the file ID).
        #[arg(long)]
        name: Option<String>,
    },

    /// Run the REST facade for the mobile client.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { folder } => {
            let folder_id = extract_folder_id(&folder)
                .with_context(|| format!("Invalid folder URL or ID: {}", folder))?;

            let client = PublicDriveClient::new(&cli.download_dir)?;
            let files = client
                .list_files(&folder_id)
                .await
                .with_context(|| format!("Failed to list files in folder: {}", folder_id))?;

            if files.is_empty() {
                println!("No files found.");
            } else {
                println!("{:<36} {:<20} {}", "ID", "TYPE", "NAME");
                println!("{}", "-".repeat(80));
                for file in files {
                    println!("{}", file);
                }
            }
        }

        Commands::Fetch { folder } => {
            let client = PublicDriveClient::new(&cli.download_dir)?;

            let summary = client
                .process_folder(&folder)
                .await
                .with_context(|| format!("Failed to process folder: {}", folder))?;

            println!("{}", summary);
        }

        Commands::Download { file_id, name } => {
            let file_name = name.unwrap_or_else(|| file_id.clone());
            let client = PublicDriveClient::new(&cli.download_dir)?;

            print!("Downloading {}... ", file_id);

            let downloaded = client
                .download_file(&file_id, &file_name)
                .await
                .with_context(|| format!("Failed to download file: {}", file_id))?;

            println!("OK ({})", format_size(downloaded.size_bytes));
            println!("Saved to: {:?}", downloaded.path);
        }

        Commands::Serve { addr } => {
            let state = AppState::new(cli.download_dir);
            let app = router(state);

            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            println!("Serving on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
