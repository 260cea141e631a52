// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration, read from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::annotation::renderer::DEFAULT_FONT_SIZE;
use crate::detection::MatchStrategy;
use crate::vision::{OutputFormat, DEFAULT_MAX_IMAGE_BYTES};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("Invalid bind address {0}")]
    InvalidAddress(String),
}

/// Configuration for the annotation service
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    /// Detection table (xlsx, xls, ods or csv)
    pub table_path: PathBuf,
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// How identifiers are matched against the table
    pub match_strategy: MatchStrategy,
    /// TrueType font for label text; system fonts are tried when unset
    pub font_path: Option<PathBuf>,
    /// Label text height in pixels
    pub font_size: f32,
    /// Encoding of annotated images
    pub output_format: OutputFormat,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl AnnotatorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any name -> value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let match_strategy = match lookup("MATCH_STRATEGY") {
            Some(v) => v.parse().map_err(|message| ConfigError::InvalidValue {
                name: "MATCH_STRATEGY".to_string(),
                message,
            })?,
            None => defaults.match_strategy,
        };

        let output_format = match lookup("OUTPUT_FORMAT") {
            Some(v) => v.parse().map_err(|message| ConfigError::InvalidValue {
                name: "OUTPUT_FORMAT".to_string(),
                message,
            })?,
            None => defaults.output_format,
        };

        let config = Self {
            table_path: lookup("EXCEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.table_path),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_number(&lookup, "PORT", defaults.port)?,
            match_strategy,
            font_path: lookup("FONT_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            font_size: parse_number(&lookup, "LABEL_FONT_SIZE", defaults.font_size)?,
            output_format,
            max_upload_bytes: parse_number(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "LABEL_FONT_SIZE".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_UPLOAD_BYTES".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        self.bind_address()?;
        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

fn parse_number<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{}' is not a valid number", raw),
        }),
        None => Ok(default),
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from("train.xlsx"),
            host: "0.0.0.0".to_string(),
            port: 5000,
            match_strategy: MatchStrategy::Substring,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            output_format: OutputFormat::Jpeg,
            max_upload_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}
