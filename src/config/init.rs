use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use crate::config::Config;

const TEMPLATE_HEADER: &str = "\
# term-grade configuration
#
# weights: fraction of the final grade each component carries (must add up to 1.0)
#   exam is prelim + midterm for the midterm term, the final exam for finals
# scale: inclusive percentage bands; leave out min_percentage for the lowest band.
#   Rounded percentages of 73 and below always get 5.00.
";

/// Write the default configuration to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(&Config::default()).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(TEMPLATE_HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    tracing::info!(path = %path.display(), "wrote default config");
    Ok(())
}
