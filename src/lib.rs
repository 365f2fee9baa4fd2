//! i18n-extract - incremental i18n text extraction for JS/TS projects
//!
//! Finds natural-language literals in JS/JSX/TS/TSX sources, gives each distinct
//! text a stable numeric id, rewrites the literals into calls to a runtime lookup
//! function, and keeps a registry of every text with its source locations.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and report printing)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (detector, ids, registry, rewriting)
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod utils;
