//! Offline tool for cartogram mappacks.
//!
//! Provides:
//! - A summary of each map version (size, totals, legend value)
//! - GeoJSON export of a version's raw geometry
//! - Legend grid options, texts and self-checks
//! - SVG rendering of a version

mod load;
mod render;

use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::json;

use cartogram_core::map::{CartMap, BASE_SYSNAME};
use cartogram_core::{Affine, R2};

use load::{load_map, parse_extra_layer, ExtraLayer};
use render::{render_svg, RenderConfig};

#[derive(Parser)]
#[command(name = "cartogram")]
#[command(about = "Inspect, export and render cartogram mappacks", long_about = None)]
#[command(version = env!("CARTOGRAM_BUILD_SHA"))]
struct Cli {
    /// Mappack file (.json or .json.gz)
    #[arg(global = true, short, long, default_value = "mappack.json")]
    mappack: String,

    /// Extra version to add after the mappack's layers (repeatable)
    #[arg(global = true, short, long = "add", value_name = "SYSNAME=PATH", value_parser = parse_extra_layer)]
    add: Vec<ExtraLayer>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize each version: canvas size, area and total value
    Versions,

    /// Export a version's raw geometry as a GeoJSON FeatureCollection
    Geojson {
        /// Version sysname
        #[arg(short, long, default_value = BASE_SYSNAME)]
        version: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print legend grid options, their texts and verification results
    Legend {
        /// Version sysname
        #[arg(short, long, default_value = BASE_SYSNAME)]
        version: String,
    },

    /// Render a version to SVG
    Render {
        /// Version sysname
        #[arg(short, long, default_value = BASE_SYSNAME)]
        version: String,

        /// Overlay the legend grid for this option index
        #[arg(short, long)]
        grid: Option<usize>,

        /// Uniform zoom applied to the map group
        #[arg(short, long)]
        zoom: Option<f64>,

        /// Omit labels
        #[arg(long)]
        no_labels: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path))?;
            info!("wrote {}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn versions(map: &CartMap) -> Result<()> {
    for (sysname, version) in map.versions.iter() {
        println!(
            "{}\t{} ({})\t{:.1}x{:.1}px\tarea {:.1}\t{}",
            sysname,
            version.name,
            version.unit,
            version.dimension.x,
            version.dimension.y,
            version.legend.geo_area,
            map.total_text(sysname)?,
        );
    }
    println!("canvas {:.1}x{:.1}px, {} regions", map.max_width, map.max_height, map.regions.len());
    Ok(())
}

fn legend(map: &mut CartMap, sysname: &str) -> Result<()> {
    let grid = map.legend(sysname)?;
    let mut options = vec![];
    for (idx, option) in grid.options.iter().enumerate() {
        let text = map.legend_text(sysname, idx)?;
        let check = map.verify_legend(sysname, idx)?;
        options.push(json!({
            "width": option.width,
            "nice_number": option.nice_number,
            "text": text.plain(),
            "ok": check.ok,
        }));
    }
    let mut area_legend = map.area_legend(sysname)?;
    let compact: Vec<String> = (0..grid.options.len())
        .map(|idx| area_legend.update_legend_value(idx, (1., 1.)).to_string())
        .collect();
    let out = json!({
        "sysname": sysname,
        "compact_total": area_legend.total_text,
        "compact_options": compact,
        "value_per_square": grid.value_per_square,
        "scale_power_of_10": grid.scale_power_of_10,
        "total": map.total_text(sysname)?,
        "options": options,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut map = load_map(&cli.mappack, &cli.add)?;

    match cli.command {
        Commands::Versions => versions(&map)?,
        Commands::Geojson { version, output } => {
            let fc = map.version_geojson(&version)?;
            write_output(output.as_deref(), &serde_json::to_string(&fc)?)?;
        }
        Commands::Legend { version } => legend(&mut map, &version)?,
        Commands::Render { version, grid, zoom, no_labels, output } => {
            let grid_path = match grid {
                Some(idx) => Some(map.legend(&version)?.option(idx)?.grid_path.clone()),
                None => None,
            };
            let transform = zoom.map(|z| {
                // Zoom about the canvas center.
                let center = R2::new(map.max_width / 2., map.max_height / 2.);
                let m = Affine::translate(center.x, center.y) * Affine::scale(z, z) * Affine::translate(-center.x, -center.y);
                m.svg_transform()
            });
            let plan = map.draw_version(&version)?;
            let config = RenderConfig {
                show_labels: !no_labels,
                grid_path,
                transform,
                ..RenderConfig::default()
            };
            write_output(output.as_deref(), &render_svg(&plan, &config)?)?;
        }
    }
    Ok(())
}
