use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use edge_router::config::{load_config, EdgeConfig};
use edge_router::edge::handle_event;
use edge_router::EdgeRouter;

#[derive(Parser)]
#[command(name = "edge-cli")]
#[command(about = "Inspect and query the edge router", long_about = None)]
struct Cli {
    /// Admin API base URL.
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    /// Admin API key.
    #[arg(short, long, default_value = "")]
    key: String,

    /// Config file whose [routing] section is used for offline commands.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a host/URI pair locally
    Rewrite {
        #[arg(long)]
        host: String,
        #[arg(long)]
        uri: String,
    },
    /// Route an edge event (JSON) from a file or stdin
    Event {
        file: Option<PathBuf>,
    },
    /// Check edge router status via the admin API
    Status,
    /// Ask the running edge router how it would rewrite a request
    Preview {
        #[arg(long)]
        host: String,
        #[arg(long)]
        uri: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rewrite { host, uri } => {
            let router = local_router(cli.config.as_ref())?;
            println!("{}", router.rewrite(&host, &uri).uri);
        }
        Commands::Event { file } => {
            let router = local_router(cli.config.as_ref())?;
            let event = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let request: Value = serde_json::from_str(&handle_event(&router, &event)?)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Commands::Status => {
            let res = admin_client(&cli.key)?
                .get(format!("{}/admin/status", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Preview { host, uri } => {
            let res = admin_client(&cli.key)?
                .get(format!("{}/admin/rewrite", cli.url))
                .query(&[("host", host), ("uri", uri)])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn local_router(config: Option<&PathBuf>) -> Result<EdgeRouter, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };
    Ok(EdgeRouter::new(&config.routing))
}

fn admin_client(key: &str) -> Result<reqwest::Client, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", key))?,
    );
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
