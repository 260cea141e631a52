// Version information for the X-ray annotation service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-xray-annotation-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "table-lookup",
    "keyword-fallback",
    "match-strategies",
    "xlsx-tables",
    "csv-tables",
    "inline-base64-response",
    "file-response",
];
