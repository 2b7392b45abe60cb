// src/config/consts.rs

// Mapping store
pub const DEFAULT_MAPPING_FILE: &str = "corrected_territorial_mapping.json";

// Record sources
pub const DEFAULT_RECORDS_FILE: &str = "TempShopify/output_dsc0001-9999.csv";
pub const DEFAULT_CATALOG_FILE: &str = "images_for_squarespace_githubthumbs.json";

// Local log
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = ".store/debug.log";
pub const LOG_ENV: &str = "LICHEN_LOG";

// Entry shaping
pub const ACK_PREFIX: &str = "territorial acknowledgement to the ";
pub const NATION_SEP: &str = ", ";

// Audit
pub const AUDIT_SAMPLE: usize = 10;
pub const EXCERPT_CHARS: usize = 100;
