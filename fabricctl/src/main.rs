// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `fabricctl`: generate a layout snapshot of a fabric partition tree.

#![deny(clippy::all, clippy::pedantic)]

use clap::Parser;
use layout::{LayoutVersion, generate_layout};
use provider::static_tree::StaticTree;
use std::path::PathBuf;
use tracing::info;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "fabricctl",
    about = "generate a canonical layout snapshot of a fabric partition tree"
)]
struct CmdArgs {
    /// Path to the YAML tree description to generate from.
    #[arg(long, value_name = "FILE")]
    tree: PathBuf,

    /// Target layout format version (9: legacy listing, 10: compacting).
    #[arg(long, value_name = "VERSION", default_value = "10")]
    layout_version: LayoutVersion,

    /// Id of the container to walk from.
    #[arg(long, value_name = "ID", default_value_t = 1)]
    root: u32,

    /// Log level filter (off, error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

fn init_logging(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = CmdArgs::parse();
    init_logging(args.log_level);

    let tree = match StaticTree::from_path(&args.tree) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("fabricctl: failed to load {}: {e}", args.tree.display());
            std::process::exit(1);
        }
    };
    info!(
        "generating version {} layout from {}",
        args.layout_version,
        args.tree.display()
    );

    match generate_layout(&tree, args.root, args.layout_version) {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("fabricctl: {e}");
            std::process::exit(1);
        }
    }
}
