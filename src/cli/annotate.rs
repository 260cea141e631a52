// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::annotation::renderer::DEFAULT_FONT_SIZE;
use crate::config::AnnotatorConfig;
use crate::detection::{DetectionResolver, DetectionTable, MatchStrategy};
use crate::service::AnnotationPipeline;
use crate::vision::OutputFormat;

/// Arguments for the annotate command
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Image to annotate
    pub image: PathBuf,

    /// Detection table (xlsx, xls, ods or csv)
    #[arg(long, env = "EXCEL_PATH", default_value = "train.xlsx")]
    pub table: PathBuf,

    /// Where to write the annotated image (defaults to <name>_annotated.<ext>)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Lookup identifier (defaults to the image file name without extension)
    #[arg(long)]
    pub identifier: Option<String>,

    /// Identifier match strategy: substring, exact or normalized
    #[arg(long, env = "MATCH_STRATEGY", default_value = "substring")]
    pub match_strategy: MatchStrategy,

    /// TrueType font for label text
    #[arg(long, env = "FONT_PATH")]
    pub font: Option<PathBuf>,

    /// Label text height in pixels
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
    pub font_size: f32,

    /// Output encoding (jpeg or png); inferred from --output when omitted
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the lookup command
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Image identifier to resolve
    pub identifier: String,

    /// Image height in pixels, used to place fallback placeholders
    #[arg(long)]
    pub height: u32,

    /// Detection table (xlsx, xls, ods or csv)
    #[arg(long, env = "EXCEL_PATH", default_value = "train.xlsx")]
    pub table: PathBuf,

    /// Identifier match strategy: substring, exact or normalized
    #[arg(long, env = "MATCH_STRATEGY", default_value = "substring")]
    pub match_strategy: MatchStrategy,
}

fn load_table(path: &Path) -> Result<Arc<DetectionTable>> {
    let table = DetectionTable::load(path)
        .with_context(|| format!("failed to load detection table {}", path.display()))?;
    Ok(Arc::new(table))
}

/// Output encoding: explicit flag, then output extension, then JPEG
pub fn resolve_output_format(explicit: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
    explicit
        .or_else(|| {
            output
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse().ok())
        })
        .unwrap_or_default()
}

/// `<dir>/<stem>_annotated.<ext>` beside the input image
pub fn default_output_path(image: &Path, format: OutputFormat) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("{}_annotated.{}", stem, format.extension()))
}

/// Annotate a local image file and print the report as JSON
pub fn annotate_file(args: AnnotateArgs) -> Result<()> {
    let table = load_table(&args.table)?;
    let format = resolve_output_format(args.format, args.output.as_deref());

    let config = AnnotatorConfig {
        table_path: args.table.clone(),
        match_strategy: args.match_strategy,
        font_path: args.font.clone(),
        font_size: args.font_size,
        output_format: format,
        max_upload_bytes: usize::MAX,
        ..AnnotatorConfig::default()
    };
    config.validate()?;
    let pipeline = AnnotationPipeline::from_config(&config, table);

    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;

    let annotation = match &args.identifier {
        Some(identifier) => pipeline.annotate_bytes(&bytes, identifier.as_str()),
        None => {
            let name = args
                .image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pipeline.annotate_upload(&bytes, &name)
        }
    }
    .with_context(|| format!("failed to annotate {}", args.image.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.image, format));
    std::fs::write(&output, &annotation.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!("Wrote annotated image to {}", output.display());

    let summary = json!({
        "identifier": annotation.identifier,
        "output": output.display().to_string(),
        "detections": annotation.detection_count,
        "report": annotation.report,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Resolve detections for an identifier without touching any image
pub fn lookup(args: LookupArgs) -> Result<()> {
    let table = load_table(&args.table)?;
    let resolver = DetectionResolver::with_strategy(table, args.match_strategy);
    let detections = resolver.resolve(&args.identifier, args.height);

    println!("{}", serde_json::to_string_pretty(&detections)?);
    Ok(())
}
