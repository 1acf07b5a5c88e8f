use std::path::Path;

use anyhow::{bail, Result};

use easescroll_core::AppConfig;

/// Print the config path; `custom` is the `--config` override
pub fn path(custom: Option<&Path>) -> Result<()> {
    match custom {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", AppConfig::config_path().display()),
    }
    Ok(())
}

pub fn init(custom: Option<&Path>, force: bool) -> Result<()> {
    let config_path = custom
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path);

    if config_path.exists() && !force {
        bail!(
            "{} already exists.\nUse `easescroll config init --force` to overwrite it.",
            config_path.display()
        );
    }

    let config = AppConfig::default();
    match custom {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    println!("Wrote default configuration to {}", config_path.display());
    Ok(())
}
