//! CLI tool to request a route plan from the planning server.

use anyhow::{bail, Context, Result};
use clap::Parser;
use droproute_cli::RouteServerClient;
use droproute_core::{haversine_distance_m, Point};
use std::path::PathBuf;

/// Request a delivery route plan for a set of [lon, lat] points
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Planning server URL
    #[arg(long, default_value = "http://localhost:4000")]
    url: String,

    /// JSON file holding an array of [lon, lat] pairs
    #[arg(long)]
    points: Option<PathBuf>,

    /// Inline point as "lon,lat" (repeatable)
    #[arg(long = "point")]
    point: Vec<String>,

    /// Solver: greedy construction only, or greedy plus 2-opt
    #[arg(long, default_value = "2opt", value_parser = ["greedy", "2opt"])]
    method: String,

    /// Costing profile override (e.g. pedestrian, bicycle, auto)
    #[arg(long)]
    profile: Option<String>,

    /// Connect street legs through every stop instead of cluster centroids
    #[arg(long)]
    detailed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut points: Vec<[f64; 2]> = Vec::new();
    if let Some(path) = &args.points {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_points: Vec<[f64; 2]> =
            serde_json::from_str(&raw).context("Points file must be a JSON array of [lon, lat]")?;
        points.extend(file_points);
    }
    for text in &args.point {
        points.push(parse_point(text)?);
    }
    if points.is_empty() {
        bail!("No points given; use --points <file> or --point lon,lat");
    }
    for pair in &points {
        if !Point::from_lonlat(*pair).is_valid() {
            bail!(
                "Point [{}, {}] has non-finite coordinates",
                pair[0],
                pair[1]
            );
        }
    }

    println!(
        "Requesting a plan for {} points from {}...",
        points.len(),
        args.url
    );
    let client = RouteServerClient::new(&args.url);
    let plan = client
        .plan(
            &points,
            args.method == "2opt",
            args.profile.as_deref(),
            args.detailed.then_some("detailed"),
        )
        .await?;

    let order = plan["visit_order"].as_array().cloned().unwrap_or_default();
    println!("Visit order ({} stops):", order.len());
    let mut schematic_m = 0.0;
    let mut previous: Option<Point> = None;
    for (index, stop) in order.iter().enumerate() {
        let lon = stop[0].as_f64().unwrap_or(f64::NAN);
        let lat = stop[1].as_f64().unwrap_or(f64::NAN);
        println!("  [{:3}] ({:.6}, {:.6})", index + 1, lon, lat);
        let point = Point::new(lon, lat);
        if let Some(prev) = previous {
            schematic_m += haversine_distance_m(prev, point);
        }
        previous = Some(point);
    }
    println!();
    println!("Schematic length: {:.0} m", schematic_m);
    if let Some(stats) = plan.get("stats").filter(|s| !s.is_null()) {
        println!(
            "Drawn road length: {:.0} m over {} segments ({} straight, {} dropped)",
            stats["road_length_m"].as_f64().unwrap_or(0.0),
            plan["segments"].as_array().map(|s| s.len()).unwrap_or(0),
            stats["straight_fallbacks"].as_u64().unwrap_or(0),
            stats["dropped_segments"].as_u64().unwrap_or(0)
        );
    }
    for warning in plan["warnings"].as_array().into_iter().flatten() {
        println!("Warning: {}", warning.as_str().unwrap_or_default());
    }

    Ok(())
}

/// Parse "lon,lat" into a coordinate pair.
fn parse_point(text: &str) -> Result<[f64; 2]> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != 2 {
        bail!("Point '{}' is not in lon,lat form", text);
    }
    let lon: f64 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Bad longitude in '{}'", text))?;
    let lat: f64 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Bad latitude in '{}'", text))?;
    Ok([lon, lat])
}
