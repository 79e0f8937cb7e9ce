//! CLI handler for converting recognizer exports.
//!
//! Reads one export file (or a folder of them), runs the normalization
//! engine, and writes the unconverted and converted tables beside the input.

use anyhow::{bail, Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cli::args::ConvertCliArgs;
use crate::config::Config;
use crate::engine::Engine;
use crate::export::lattice_to_table;
use crate::import::import_lattice;

const INPUT_EXTENSIONS: [&str; 2] = ["json", "txt"];

/// Handle the convert CLI command.
pub fn handle_convert_command(args: ConvertCliArgs) -> Result<()> {
    if !args.path.exists() {
        bail!("Input not found: {}", args.path.display());
    }

    let config = Config::load();
    let engine = Engine::new(config)?;

    if args.path.is_dir() {
        convert_folder(&engine, &args)
    } else {
        convert_file(&engine, &args)
    }
}

fn convert_file(engine: &Engine, args: &ConvertCliArgs) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let written = process_input(engine, &args.path, &output_dir, &args.exclude, args.force, false)?;
    for path in &written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn convert_folder(engine: &Engine, args: &ConvertCliArgs) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .path
            .join(format!("output_{}", Local::now().format("%Y%m%d%H%M%S"))),
    };
    std::fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let inputs: Vec<PathBuf> = WalkDir::new(&args.path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| INPUT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();

    if inputs.is_empty() {
        bail!("No recognizer exports found in {}", args.path.display());
    }

    let pb = create_progress_bar(inputs.len() as u64);
    let mut converted = 0usize;

    for input in &inputs {
        pb.set_message(
            input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        // A malformed export skips that file only; the batch continues
        match process_input(engine, input, &output_dir, &args.exclude, args.force, true) {
            Ok(_) => converted += 1,
            Err(err) => warn!("Skipping {}: {}", input.display(), err),
        }
        pb.inc(1);
    }

    pb.finish_with_message("Complete");
    println!(
        "Converted {}/{} exports into {}",
        converted,
        inputs.len(),
        output_dir.display()
    );

    Ok(())
}

/// Convert one export file, returning the paths written.
fn process_input(
    engine: &Engine,
    input: &Path,
    output_dir: &Path,
    excludes: &[String],
    force: bool,
    with_force_variant: bool,
) -> Result<Vec<PathBuf>> {
    let document = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let imported = import_lattice(&document)
        .with_context(|| format!("Failed to parse {}", input.display()))?;
    debug!(
        keywords = imported.keywords.len(),
        "Imported {}",
        input.display()
    );

    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lattice".to_string());

    let mut written = Vec::new();

    let raw_path = output_dir.join(format!("{stem}.csv"));
    std::fs::write(&raw_path, lattice_to_table(&imported.lattice))
        .with_context(|| format!("Failed to write {}", raw_path.display()))?;
    written.push(raw_path);

    let normalized = engine.execute(imported.lattice.clone(), excludes, force);
    let arabic_path = output_dir.join(format!("{stem}.arabic.csv"));
    std::fs::write(&arabic_path, lattice_to_table(&normalized))
        .with_context(|| format!("Failed to write {}", arabic_path.display()))?;
    written.push(arabic_path);

    if with_force_variant && !force {
        let forced = engine.execute(imported.lattice, excludes, true);
        let force_path = output_dir.join(format!("{stem}.force.csv"));
        std::fs::write(&force_path, lattice_to_table(&forced))
            .with_context(|| format!("Failed to write {}", force_path.display()))?;
        written.push(force_path);
    }

    Ok(written)
}

/// Create a styled progress bar for the folder batch.
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("━╸━"),
    );
    pb
}
