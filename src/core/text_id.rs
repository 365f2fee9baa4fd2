//! Stable numeric identifiers for extracted text.
//!
//! The id is a 32-bit rolling hash over the UTF-16 code units of the text
//! (`hash * 31 + unit`, wrapping). It must stay bit-exact: registries written by
//! earlier runs, or by other tools using the same scheme, key translations by it.
//! Collisions are not resolved.

/// Derive the id for `text`. Empty text yields `0`.
pub fn text_id(text: &str) -> i32 {
    text.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
    })
}
