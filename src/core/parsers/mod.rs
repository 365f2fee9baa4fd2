//! Source parsing.
//!
//! - `jsx`: JS/JSX/TS/TSX source parser (uses swc for AST generation)

pub mod jsx;
