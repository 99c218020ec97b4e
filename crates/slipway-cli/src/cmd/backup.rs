use anyhow::Context;
use chrono::Utc;
use slipway_core::config::DeployConfig;
use slipway_core::pipeline;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let cfg = DeployConfig::load(root).context("failed to load slipway.yaml")?;
    let exec = super::remote_executor(&cfg)?;
    let path = pipeline::backup_db(&cfg, &exec, Utc::now())?;
    println!("Backup stored at {}", path.display());
    Ok(())
}
