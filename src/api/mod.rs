// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod annotate;
pub mod errors;
pub mod http_server;

pub use annotate::{annotate_file_handler, annotate_handler, AnnotateResponse};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_router, start_server, AppState, HealthResponse};
