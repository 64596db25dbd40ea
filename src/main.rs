//! `unfurl` prints the link preview extracted from a URL.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use unfurl::{LinkPreviewProvider, ProcessingOptions};

/// Extract title, description, images and favicon from a web page
#[derive(Parser, Debug)]
#[command(name = "unfurl")]
#[command(version)]
#[command(about = "Print the link preview metadata for a URL")]
struct Args {
    /// The URL to print metadata for (https:// is assumed if no scheme is given)
    url: String,

    /// Only use the fetched page; skip favicon probes and site API calls
    #[arg(long)]
    no_additional_requests: bool,

    /// Timeout for the page fetch, in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Extra request header, e.g. -H 'Accept-Language: fr'
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Print the preview as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut options = ProcessingOptions::from_env()?;
    if args.no_additional_requests {
        options.allow_additional_requests = false;
    }
    if let Some(secs) = args.timeout {
        options.request_timeout = Duration::from_secs(secs);
    }

    let url = with_default_scheme(&args.url);
    let headers = parse_headers(&args.headers)?;
    let provider = LinkPreviewProvider::new(options)?;

    let shutdown_token = CancellationToken::new();
    {
        let shutdown_token = shutdown_token.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, cancelling");
            shutdown_token.cancel();
        });
    }

    let preview = provider
        .load_cancellable(&url, headers, &shutdown_token)
        .await
        .with_context(|| format!("failed to load {url}"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        println!("{preview}");
    }
    Ok(())
}

fn with_default_scheme(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once(':') else {
            bail!("invalid header {entry:?}, expected 'Name: value'");
        };
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .with_context(|| format!("invalid header name in {entry:?}"))?;
        let value = HeaderValue::from_str(value.trim())
            .with_context(|| format!("invalid header value in {entry:?}"))?;
        headers.append(name, value);
    }
    Ok(headers)
}
