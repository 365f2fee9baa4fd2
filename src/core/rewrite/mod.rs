//! Rewrite engine: replaces translatable literals with calls to the lookup function.

pub mod edits;
mod literal_rewriter;
mod lookup_binding;


pub use edits::{TextEdit, apply_edits};
pub use literal_rewriter::{LiteralRewriter, Replacement, RewriteResult, template_message};
pub use lookup_binding::{import_edit, unique_binding_name};
