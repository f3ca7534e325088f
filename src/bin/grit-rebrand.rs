// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rebrand the string resources of a Chromium fork.
//!
//! Before running this program, replace the upstream product names in
//! the `.grd` files (for example "Chromium" and "Google Chrome" with
//! "Brave"). The `ids` command then moves the existing translations
//! in the `.xtb` files over to the ids of the rebranded strings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use grit_rebrand::config::Config;
use grit_rebrand::fingerprint::fingerprint;
use grit_rebrand::strings::sync_strings_file;
use grit_rebrand::{build_id_map, rewrite_trees};
use log::{info, warn};

#[derive(Clone, Debug, Parser)]
struct Cli {
    /// Configuration file, see `Config` for the keys.
    #[arg(short, long, global = true, value_name = "rebrand.toml")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Replace upstream translation ids with the ids of the rebranded strings.
    Ids {
        /// Rebranded resource definitions, overrides `grd-files`.
        #[arg(long = "grd", value_name = "strings.grd")]
        grd_files: Vec<PathBuf>,
        /// Directories with translation bundles, overrides `translation-dirs`.
        #[arg(value_name = "DIR")]
        translation_dirs: Vec<PathBuf>,
        /// Report what would change without writing any file.
        #[arg(long)]
        dry_run: bool,
        /// Write the id map as JSON to this file.
        #[arg(long, value_name = "map.json")]
        dump_map: Option<PathBuf>,
    },
    /// Update the values in an Android strings.xml file from a resource definition.
    SyncStrings {
        #[arg(long, value_name = "strings.xml")]
        strings: Option<PathBuf>,
        #[arg(long, value_name = "strings.grd")]
        grd: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the translation id of each text.
    Fingerprint {
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Ids {
            grd_files,
            translation_dirs,
            dry_run,
            dump_map,
        } => {
            let grd_files = or_configured(grd_files, &config.grd_files);
            let translation_dirs = or_configured(translation_dirs, &config.translation_dirs);
            ids(
                &config,
                &grd_files,
                &translation_dirs,
                dry_run,
                dump_map.as_deref(),
            )?;
        }
        Command::SyncStrings {
            strings,
            grd,
            dry_run,
        } => {
            let Some(strings) = strings.or_else(|| config.strings.file.clone()) else {
                bail!("No strings.xml file given, use --strings or strings.file");
            };
            let Some(grd) = grd.or_else(|| config.strings.grd.clone()) else {
                bail!("No .grd file given, use --grd or strings.grd");
            };
            let updates = sync_strings_file(&strings, &grd, &config.strings.skip, dry_run)?;
            info!(
                "Strings check finished successfully, {} strings updated",
                updates.len()
            );
        }
        Command::Fingerprint { texts } => print_fingerprints(&texts),
    }

    Ok(())
}

/// Paths from the command line win over the ones from the config file.
fn or_configured(paths: Vec<PathBuf>, configured: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        configured.to_vec()
    } else {
        paths
    }
}

fn ids(
    config: &Config,
    grd_files: &[PathBuf],
    translation_dirs: &[PathBuf],
    dry_run: bool,
    dump_map: Option<&Path>,
) -> anyhow::Result<()> {
    if grd_files.is_empty() {
        bail!("No .grd files given, use --grd or grd-files");
    }
    if translation_dirs.is_empty() {
        bail!("No translation directories given");
    }

    let filter = config.bundle_filter()?;
    let map = build_id_map(grd_files, config)?;
    for id in map.unstable_ids() {
        warn!("{id} is both an old and a new id, rewriting is not idempotent");
    }
    if let Some(path) = dump_map {
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(path, json).with_context(|| format!("Could not write {}", path.display()))?;
    }

    let summary = rewrite_trees(translation_dirs, &filter, &map, dry_run)?;
    info!("{summary}");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_fingerprints(texts: &[String]) {
    for text in texts {
        println!("{} - {text}", fingerprint(text));
    }
}
