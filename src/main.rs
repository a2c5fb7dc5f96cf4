use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use reqwest::Method;
use tracing::info;

use notifkit::body::timestamp::extract_timestamp_plain;
use notifkit::config::Config;
use notifkit::http::client::{JsonClient, RequestError, RequestOptions};
use notifkit::image::reference::classify_with_gateway;
use notifkit::notification::{parse_payloads, NotificationProcessor};
use notifkit::output::terminal;

/// notifkit: post-process push notification payloads.
///
/// Classifies notification images, strips `[timestamp:...]` tags from
/// bodies, and sends one-shot JSON requests.
#[derive(Parser)]
#[command(name = "notifkit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an image URL (http, ipfs or base64)
    Image {
        /// The image URL; omit to classify an absent image
        url: Option<String>,
    },

    /// Extract the timestamp tag from a notification body
    Timestamp {
        /// The raw body text
        body: String,
    },

    /// Process notification payloads from a JSON file
    Process {
        /// JSON file holding one payload or an array ("-" reads stdin)
        file: PathBuf,

        /// Print JSON instead of the terminal view
        #[arg(long)]
        json: bool,
    },

    /// Send one JSON request and print the response
    Fetch {
        url: String,

        /// HTTP method (default: GET)
        #[arg(long, short = 'X')]
        method: Option<String>,

        /// Extra header as NAME:VALUE (repeatable)
        #[arg(long = "header", short = 'H')]
        headers: Vec<String>,

        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notifkit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Image { url } => {
            let reference = classify_with_gateway(url.as_deref(), &config.ipfs_gateway);
            println!("{}", serde_json::to_string_pretty(&reference)?);
        }

        Commands::Timestamp { body } => {
            let parsed = extract_timestamp_plain(&body);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            match parsed.sent_at() {
                Some(sent_at) => eprintln!("{} {}", "sent at".dimmed(), sent_at.to_rfc3339()),
                None if parsed.has_timestamp() => {
                    eprintln!("{}", "Timestamp present but not a recognized time format".yellow())
                }
                None => {}
            }
        }

        Commands::Process { file, json } => {
            let raw = read_input(&file)?;
            let payloads = parse_payloads(&raw)?;
            info!(count = payloads.len(), "Processing notification payloads");

            let processor = NotificationProcessor::new(&config.ipfs_gateway);
            let processed = processor.process_batch(&payloads);

            if json {
                println!("{}", serde_json::to_string_pretty(&processed)?);
            } else {
                terminal::display_notifications(&processed);
            }
        }

        Commands::Fetch {
            url,
            method,
            headers,
            body,
        } => {
            let options = build_options(method.as_deref(), &headers, body.as_deref())?;
            let client = JsonClient::with_reqwest(&config.user_agent)?;

            match client.request::<serde_json::Value>(&url, options).await {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(RequestError::Status {
                    status,
                    status_text,
                    body,
                }) => {
                    eprintln!("{} {}", "!!".red().bold(), body);
                    anyhow::bail!("{url} returned {} {status_text}", status.as_u16());
                }
                Err(e) => return Err(e).with_context(|| format!("Request to {url} failed")),
            }
        }
    }

    Ok(())
}

/// Read a file, or stdin when the path is "-".
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Turn CLI flags into request options.
fn build_options(
    method: Option<&str>,
    headers: &[String],
    body: Option<&str>,
) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();

    if let Some(method) = method {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .with_context(|| format!("Invalid HTTP method: {method}"))?;
        options = options.method(method);
    }

    for header in headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("Header must be NAME:VALUE, got {header:?}"))?;
        options = options.header(name.trim(), value.trim());
    }

    if let Some(body) = body {
        let value: serde_json::Value =
            serde_json::from_str(body).context("Request body is not valid JSON")?;
        options = options.json(value);
    }

    Ok(options)
}
