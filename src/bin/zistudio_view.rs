//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Command-line studio viewer.
//!
//! Prints each visualization item of a locally stored dataset as one JSON
//! line, or the dataset's sample count with `--length`. Logging goes to
//! stderr through `env_logger`; set `RUST_LOG=debug` for per-manifest detail.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use zistudio::{ZiCDatasetLocator, ZiCStudioView, ZiCTaskType, ZiCViewConfig};

/// Inspect a local dataset as a stream of visualization items
#[derive(Parser, Debug)]
#[command(name = "zistudio-view")]
#[command(version, about, long_about = None)]
struct ZiCViewArgs {
    /// Dataset name, looked up under the configured storage roots
    dataset: String,

    /// Task deciding which fields are drawn
    /// (classification, detection, semantic-seg, instance-seg, keypoint, ocr)
    #[arg(short = 't', long = "task")]
    task: ZiCTaskType,

    /// Maximum number of items to print
    #[arg(short = 'n', long = "max-items")]
    max_items: Option<usize>,

    /// Shuffle records within each split
    #[arg(long = "shuffle")]
    shuffle: bool,

    /// Seed for a reproducible shuffle
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Storage config file (defaults to ZI_STUDIO_CONFIG or ~/.dsdl/dsdl.json)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Directory searched for imported schema files
    #[arg(long = "library")]
    library: Option<PathBuf>,

    /// Print the number of samples and exit
    #[arg(long = "length")]
    length: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ZiCViewArgs::parse();

    let locator = match &args.config {
        Some(path) => ZiCDatasetLocator::ZiFNew(path),
        None => ZiCDatasetLocator::ZiFDefault(),
    };

    let mut config = ZiCViewConfig::ZiFNew(args.task).ZiFShuffle(args.shuffle);
    if let Some(max_items) = args.max_items {
        config = config.ZiFMaxItems(max_items);
    }
    if let Some(seed) = args.seed {
        config = config.ZiFSeed(seed);
    }
    if let Some(library) = &args.library {
        config = config.ZiFLibraryPath(library);
    }

    let mut view = ZiCStudioView::ZiFOpenWith(&locator, &args.dataset, config)
        .with_context(|| format!("failed to open dataset '{}'", args.dataset))?;
    log::info!(
        "Opened '{}' at {} with {} manifests",
        args.dataset,
        view.ZiFLayout().dataset_dir.display(),
        view.ZiFLayout().manifests.len()
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if args.length {
        let length = view
            .ZiFLen()
            .with_context(|| format!("failed to count samples of '{}'", args.dataset))?;
        writeln!(out, "{}", length)?;
        return Ok(());
    }

    while let Some(item) = view
        .ZiFNextItem()
        .with_context(|| format!("iteration over '{}' failed", args.dataset))?
    {
        serde_json::to_writer(&mut out, &item)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
