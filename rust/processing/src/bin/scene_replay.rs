// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: replay a recorded traversal into an object scene JSON file
//!
//! Usage:
//!   scene-replay <recording.json> [options]

use anyhow::{bail, Context};
use objscene_processing::{ExportConfig, ObjectSceneExporter, Recording};
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,objscene_processing=debug".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    let recording_path = PathBuf::from(&args[1]);
    let mut output_path: Option<PathBuf> = None;
    let mut variant: Option<String> = None;
    let mut config = ExportConfig::from_env();
    let mut pretty = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                let value = args.get(i).context("--output needs a path")?;
                output_path = Some(PathBuf::from(value));
            }
            "--variant" => {
                i += 1;
                variant = Some(args.get(i).context("--variant needs a name")?.clone());
            }
            "--lod" => {
                i += 1;
                let value = args.get(i).context("--lod needs a value")?;
                config.level_of_detail = value
                    .parse()
                    .with_context(|| format!("invalid level of detail: {value}"))?;
            }
            "--optimize" => config.optimize = true,
            "--pretty" => pretty = true,
            other => {
                print_usage();
                bail!("unknown option: {other}");
            }
        }
        i += 1;
    }

    let output_path = match (output_path, variant) {
        (Some(path), _) => path,
        (None, Some(variant)) => {
            objscene_processing::variant_output_path(&recording_path, &variant)
        }
        (None, None) => recording_path.with_extension("scene.json"),
    };

    let recording = Recording::from_path(&recording_path)
        .with_context(|| format!("failed to load {}", recording_path.display()))?;
    let exporter = ObjectSceneExporter::new(&recording.document, config)?;

    if pretty {
        let scene = exporter.try_export(recording.view, recording.events.iter().cloned())?;
        std::fs::write(&output_path, scene.to_json_pretty()?)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
    } else {
        exporter.export_to_file(recording.view, recording.events.iter().cloned(), &output_path)?;
    }

    tracing::info!(output = %output_path.display(), "Done");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: scene-replay <recording.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <path>   Output JSON path (default: <recording>.scene.json)");
    eprintln!("  --variant <name>      Name the output <stem>;<variant>.json");
    eprintln!("  --lod <1-15>          Tessellation level of detail (default: 15)");
    eprintln!("  --optimize            Merge duplicate geometry and prune empty nodes");
    eprintln!("  --pretty              Indent the output JSON");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG, OBJSCENE_LEVEL_OF_DETAIL, OBJSCENE_OPTIMIZE,");
    eprintln!("  OBJSCENE_METADATA_PATTERNS, OBJSCENE_EXCLUDED_SHARED_PREFIX");
}
