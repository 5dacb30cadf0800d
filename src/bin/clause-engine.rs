//! clause-engine -- demo harness for the clause locator.
//!
//! Usage: clause-engine <document> <target-file> <replacement-file>
//!            [--config <json>] [--dry-run]
//!
//! Loads a plain-text document, locates the clause held in `target-file`,
//! replaces it with the contents of `replacement-file`, prints a unified
//! diff, and persists the result atomically (unless `--dry-run`).

use std::path::PathBuf;

use anyhow::{Context, bail};
use clause_engine::{BufferDocument, LocatorConfig, locate_and_replace};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let config = match args.iter().position(|a| a == "--config") {
        Some(at) => {
            let path = args
                .get(at + 1)
                .context("--config requires a file argument")?;
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path}"))?;
            serde_json::from_str::<LocatorConfig>(&raw)
                .with_context(|| format!("invalid config in {path}"))?
        }
        None => LocatorConfig::default(),
    };

    let positional: Vec<&String> = args
        .iter()
        .enumerate()
        .filter(|&(i, a)| {
            !a.starts_with("--")
                && args.get(i.wrapping_sub(1)).is_none_or(|p| p != "--config")
        })
        .map(|(_, a)| a)
        .collect();
    let [document, target, replacement] = positional.as_slice() else {
        bail!("usage: clause-engine <document> <target-file> <replacement-file> [--config <json>] [--dry-run]");
    };

    let doc_path = PathBuf::from(document);
    let mut doc = BufferDocument::from_file(&doc_path)?;
    let target_text = std::fs::read_to_string(target)
        .with_context(|| format!("failed to read target {target}"))?;
    let replacement_text = std::fs::read_to_string(replacement)
        .with_context(|| format!("failed to read replacement {replacement}"))?;

    let before = doc.body().to_owned();
    let outcome = locate_and_replace(&mut doc, &target_text, &replacement_text, &config)?;

    if !outcome.success {
        bail!("could not find the clause in {document}");
    }

    println!(
        "{}",
        clause_engine::diff::replacement_preview(document, &before, doc.body())
    );

    if dry_run {
        eprintln!("dry run: {document} not modified");
    } else {
        doc.persist_to(&doc_path)?;
    }
    Ok(())
}
