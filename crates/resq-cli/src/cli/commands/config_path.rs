//! `resq config-path` – print where configuration is read from.

use anyhow::Result;
use resq_core::config;
use std::path::Path;

pub fn run_config_path(explicit: Option<&Path>) -> Result<()> {
    match explicit {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", config::config_path()?.display()),
    }
    Ok(())
}
