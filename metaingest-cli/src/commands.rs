//! CLI subcommand handlers.

use crate::{CheckAction, Commands};
use anyhow::Context;
use metaingest_core::{Pipeline, Registries, Source, load_recipe};
use metaingest_plugins::builtin_registries;
use metaingest_plugins::sources::{FileSource, FileSourceConfig};
use std::path::Path;
use tracing::info;

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Ingest {
            config,
            strict_warnings,
        } => handle_ingest(&config, strict_warnings),
        Commands::Check { action } => match action {
            CheckAction::Plugins { verbose } => {
                let registries = builtin_registries()?;
                print!("{}", plugins_report(&registries, verbose));
                Ok(())
            }
            CheckAction::MceFile { path } => {
                let count = check_mce_file(&path)?;
                println!("{} appears to be valid ({count} events)", path.display());
                Ok(())
            }
        },
    }
}

fn handle_ingest(recipe: &Path, strict_warnings: bool) -> anyhow::Result<()> {
    let config = load_recipe(recipe)
        .with_context(|| format!("Failed to load recipe {}", recipe.display()))?;
    let registries = builtin_registries()?;
    let mut pipeline = Pipeline::create(config, &registries)?;
    info!(run_id = %pipeline.context().run_id, "Created pipeline");

    let outcome = pipeline.run();
    pipeline.pretty_print_summary();
    outcome?;
    pipeline.raise_from_status(strict_warnings)?;
    Ok(())
}

/// Registry summaries for each plugin kind.
fn plugins_report(registries: &Registries, verbose: bool) -> String {
    let sections = [
        ("Sources", registries.sources.summary(verbose)),
        ("Transformers", registries.transformers.summary(verbose)),
        ("Sinks", registries.sinks.summary(verbose)),
    ];
    let mut out = String::new();
    for (title, summary) in sections {
        out.push_str(&format!("{title}:\n{summary}\n\n"));
    }
    out
}

/// Read every change event in `path`; fails on the first malformed entry.
fn check_mce_file(path: &Path) -> anyhow::Result<usize> {
    let mut source = FileSource::new(FileSourceConfig {
        filename: path.to_path_buf(),
    });
    let mut count = 0;
    for record in source.get_records() {
        record?;
        count += 1;
    }
    let report = source.get_report();
    if report.failure_count() > 0 {
        anyhow::bail!(
            "{} is not a valid change-event file:\n{}",
            path.display(),
            metaingest_core::report::render(report)
        );
    }
    Ok(count)
}
