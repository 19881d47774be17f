//! Generate command: fetch both sources and write the ERD artifacts.

use crate::config::ErdConfig;
use crate::graph::{render_document, DocumentMeta, ErdReport, ErdView, OutputFormat};
use crate::pipeline::{check_strict, derive, load_inputs};
use crate::source::{DefaultLoader, HttpLoader, Source};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Run the generate command
#[allow(clippy::too_many_arguments)]
pub fn run(
    exclude_orphans: bool,
    output: Option<PathBuf>,
    connected_output: Option<PathBuf>,
    dictionary: Option<String>,
    schema: Option<String>,
    format: Option<String>,
    config: Option<PathBuf>,
    strict: bool,
    dry_run: bool,
    progress: bool,
    verbose: bool,
) -> Result<()> {
    let mut config = match config {
        Some(ref path) => ErdConfig::load(path)?,
        None => ErdConfig::default(),
    };

    if let Some(dictionary) = dictionary {
        config.sources.dictionary = dictionary;
    }
    if let Some(schema) = schema {
        config.sources.schema = schema;
    }

    let format = resolve_format(format.as_deref(), output.as_deref())?;
    let output_path = output.unwrap_or_else(|| with_format_extension(&config.output.path, format));
    let connected_path = connected_output
        .unwrap_or_else(|| with_format_extension(&config.output.connected_path, format));

    let dictionary: Source = config
        .sources
        .dictionary
        .parse()
        .map_err(|e: String| anyhow::anyhow!("invalid dictionary source: {}", e))?;
    let schema: Source = config
        .sources
        .schema
        .parse()
        .map_err(|e: String| anyhow::anyhow!("invalid schema source: {}", e))?;

    let loader = DefaultLoader::new(HttpLoader::new(&config.http, progress)?);

    let start_time = Instant::now();
    eprintln!("Fetching data dictionary: {}", dictionary);
    eprintln!("Fetching schema: {}", schema);
    let inputs = load_inputs(&loader, &dictionary, &schema, &config.columns)?;
    eprintln!("Loaded {} rows from data dictionary", inputs.rows.len());
    eprintln!("Found {} primary keys in schema", inputs.keys.len());

    let derived = derive(&inputs, exclude_orphans);

    if verbose {
        eprintln!("\nProcessing entities...");
        for entity in derived.full.entities.values() {
            eprintln!(
                "  {}: PK={}, FKs={}",
                entity.name,
                entity.primary_key.as_deref().unwrap_or("not found"),
                entity.foreign_keys.len()
            );
        }
    }

    if strict {
        check_strict(&derived.full)?;
    }

    let meta = DocumentMeta::new(&config.output.title, &config.output.description);

    if dry_run {
        eprintln!("\nDry run: no files written");
    } else {
        write_artifact(&output_path, &render_document(&derived.full, &meta, format))?;
        eprintln!("\nERD written to: {}", output_path.display());

        if let Some(ref connected) = derived.connected {
            let connected_meta = meta.connected(connected.excluded);
            write_artifact(
                &connected_path,
                &render_document(connected, &connected_meta, format),
            )?;
            eprintln!("Connected ERD written to: {}", connected_path.display());
        }
    }

    print_report(&derived.full, derived.connected.as_ref());
    eprintln!("\nCompleted in {:.3?}", start_time.elapsed());

    Ok(())
}

/// Pick the format from the flag, else from the output extension
fn resolve_format(format: Option<&str>, output: Option<&Path>) -> Result<OutputFormat> {
    if let Some(f) = format {
        return f.parse().map_err(|e: String| anyhow::anyhow!(e));
    }
    Ok(output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_extension)
        .unwrap_or_default())
}

/// Swap a configured path's extension when it names another format
fn with_format_extension(path: &Path, format: OutputFormat) -> PathBuf {
    let current = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(OutputFormat::from_extension);
    match current {
        Some(f) if f != format => path.with_extension(format.extension()),
        _ => path.to_path_buf(),
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create output directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Cannot write output file: {}", path.display()))
}

fn print_report(full: &ErdView, connected: Option<&ErdView>) {
    let report = ErdReport::new(full, connected);

    println!();
    for line in report.lines() {
        println!("{}", line);
    }

    let ambiguous: Vec<_> = report.ambiguities().collect();
    if !ambiguous.is_empty() {
        eprintln!("\nWarning: relationship targets depend on declaration order:");
        for diagnostic in ambiguous {
            eprintln!("  - {}", diagnostic);
        }
    }

    let collisions: Vec<_> = report.collisions().collect();
    if !collisions.is_empty() {
        eprintln!("\nWarning: entities merged into one diagram block:");
        for diagnostic in collisions {
            eprintln!("  - {}", diagnostic);
        }
    }
}
