//! Common utility functions shared across the codebase.

/// Checks if the text contains at least one CJK unified ideograph (U+4E00..=U+9FA5).
///
/// This is the default translation-candidate test used when no `matchPattern`
/// is configured.
///
/// # Examples
///
/// ```
/// use i18n_extract::utils::contains_cjk;
///
/// assert!(contains_cjk("你好"));
/// assert!(contains_cjk("Hello 世界"));
/// assert!(!contains_cjk("Hello"));
/// assert!(!contains_cjk("123"));
/// assert!(!contains_cjk(""));
/// ```
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

/// Render `text` as a double-quoted JavaScript string literal.
///
/// JSON string syntax is a subset of JS string syntax, so serde_json's escaping
/// produces a literal that any JS parser accepts.
pub fn js_string_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text.escape_default()))
}
