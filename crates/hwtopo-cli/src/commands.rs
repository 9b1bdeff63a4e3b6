// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use hwtopo_app_core::config::ConfigService;
use hwtopo_catalog::{sample_topology, StockEnumerator};
use hwtopo_config_fs::FsConfigStore;
use hwtopo_core::{configure, verify_links, Board, Capability, Codec};
use tracing::{debug, info};

/// Codec over the stock catalog.
pub fn codec() -> Result<Codec> {
    configure(&StockEnumerator).context("failed to build type registries")
}

fn service(config_dir: Option<&Path>) -> Result<ConfigService<FsConfigStore>> {
    let store = match config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("failed to open config store")?;
    debug!(base = %store.base().display(), "config store ready");
    Ok(ConfigService::new(store))
}

pub fn types(codec: &Codec, only: Option<Capability>) -> Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Capability", "Discriminator"]);
    for capability in Capability::ALL {
        if only.is_some_and(|only| only != capability) {
            continue;
        }
        for discriminator in codec.registry().get(capability).discriminators() {
            table.add_row(vec![capability.label(), discriminator]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn print_sample(codec: &Codec) -> Result<()> {
    println!("{}", codec.write(&sample_topology())?);
    Ok(())
}

pub fn save_sample(codec: &Codec, config_dir: Option<&Path>, key: &str) -> Result<()> {
    let service = service(config_dir)?;
    service
        .save_topology(key, codec, &sample_topology())
        .with_context(|| format!("failed to store topology `{key}`"))?;
    info!(key, "sample topology stored");
    println!("stored sample topology as `{key}`");
    Ok(())
}

pub fn show(codec: &Codec, config_dir: Option<&Path>, key: &str) -> Result<()> {
    let service = service(config_dir)?;
    let Some(board) = service
        .load_topology(key, codec)
        .with_context(|| format!("failed to load topology `{key}`"))?
    else {
        bail!("no topology stored under `{key}`");
    };
    println!("{}", codec.write(&board)?);
    Ok(())
}

fn read_file(codec: &Codec, file: &Path) -> Result<(String, Board)> {
    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let board = codec
        .read(&text)
        .with_context(|| format!("failed to decode {}", file.display()))?;
    Ok((text, board))
}

pub fn check(codec: &Codec, file: &Path) -> Result<()> {
    let (_, board) = read_file(codec, file)?;
    verify_links(&board).with_context(|| format!("broken back-reference in {}", file.display()))?;

    let mut counts: BTreeMap<Capability, usize> = BTreeMap::new();
    board.visit(|_, node| *counts.entry(node.capability()).or_default() += 1);
    let summary = counts
        .iter()
        .map(|(capability, count)| format!("{capability} {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}: ok, {} nodes ({summary})",
        file.display(),
        board.node_count()
    );
    Ok(())
}

pub fn fmt(codec: &Codec, file: &Path, write: bool) -> Result<()> {
    let (original, board) = read_file(codec, file)?;
    let mut canonical = codec.write(&board)?;
    canonical.push('\n');
    if !write {
        print!("{canonical}");
        return Ok(());
    }
    if canonical == original {
        debug!(file = %file.display(), "already canonical");
        return Ok(());
    }
    fs::write(file, &canonical).with_context(|| format!("failed to write {}", file.display()))?;
    println!("formatted {}", file.display());
    Ok(())
}
