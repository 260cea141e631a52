// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod annotate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// X-ray annotation CLI
#[derive(Parser, Debug)]
#[command(name = "xray-annotate")]
#[command(version)]
#[command(about = "Annotate X-ray images from a detection table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw detections onto an image file
    Annotate(annotate::AnnotateArgs),

    /// Print the detections resolved for an identifier
    Lookup(annotate::LookupArgs),
}

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Annotate(args) => annotate::annotate_file(args),
        Commands::Lookup(args) => annotate::lookup(args),
    }
}
