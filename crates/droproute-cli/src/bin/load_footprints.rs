//! CLI tool to upload obstacle footprints from a GeoJSON file.

use anyhow::{Context, Result};
use clap::Parser;
use droproute_cli::RouteServerClient;
use serde_json::Value;
use std::path::PathBuf;

/// Upload building footprints (GeoJSON polygons) to the planning server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Planning server URL
    #[arg(long, default_value = "http://localhost:4000")]
    url: String,

    /// GeoJSON file with Polygon or MultiPolygon features
    #[arg(long)]
    file: PathBuf,

    /// Clear stored footprints before uploading
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let document: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let client = RouteServerClient::new(&args.url);

    if args.replace {
        let cleared = client.clear_footprints().await?;
        println!(
            "Cleared {} stored footprints",
            cleared["removed"].as_u64().unwrap_or(0)
        );
    }

    println!("Uploading {} to {}...", args.file.display(), args.url);
    let result = client.upload_footprints(&document).await?;
    println!(
        "Added {} footprints ({} geometries skipped)",
        result["added"].as_u64().unwrap_or(0),
        result["skipped"].as_u64().unwrap_or(0)
    );

    let listing = client.list_footprints().await?;
    println!(
        "Server now stores {} footprints",
        listing.as_array().map(|l| l.len()).unwrap_or(0)
    );

    Ok(())
}
