//! Write a config template with a placeholder key.

use anyhow::{Context, Result};
use paperchat_config::AppConfig;

pub fn run() -> Result<()> {
    let path = AppConfig::default_path();

    if path.exists() {
        println!("Config already exists at {}. Leaving it untouched.", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, AppConfig::example())
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Wrote config template to {}.", path.display());
    println!("Replace the placeholder with your Gemini API key to get started.");
    Ok(())
}
