use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Management CLI for the site server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the recent request activity log
    Logs,
    /// Fetch the public runtime config payload
    Config,
    /// Generate a self-signed localhost certificate pair
    GenCert {
        /// Where to write the PEM certificate
        #[arg(long, default_value = "cert.pem")]
        cert_out: PathBuf,

        /// Where to write the PEM private key
        #[arg(long, default_value = "key.pem")]
        key_out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Logs => {
            let res = client
                .get(format!("{}/api/logs", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Config => {
            let res = client.get(format!("{}/api/config", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::GenCert { cert_out, key_out } => {
            let pair = site_server::net::generate_self_signed()?;
            std::fs::write(&cert_out, pair.cert_pem)?;
            std::fs::write(&key_out, pair.key_pem)?;
            println!("Wrote certificate to {}", cert_out.display());
            println!("Wrote private key to {}", key_out.display());
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("{}", text);
        }
        return Ok(());
    }

    let value: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
