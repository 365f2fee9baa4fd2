use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` to `path` as pretty JSON (2-space indent, trailing newline).
///
/// Parent directories are created as needed. The content goes to a sibling
/// `.tmp` file first and is renamed over `path`, so readers never observe a
/// half-written snapshot.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    fs::write(tmp_path, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", tmp_path.display()))?;
    fs::rename(tmp_path, path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}
