use anyhow::Context;
use chrono::Utc;
use slipway_core::config::DeployConfig;
use slipway_core::pipeline;
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let cfg = DeployConfig::load(root).context("failed to load slipway.yaml")?;
    let exec = super::remote_executor(&cfg)?;
    pipeline::deploy(&cfg, &exec, Utc::now())?;
    Ok(())
}

pub fn run_in_place(root: &Path) -> anyhow::Result<()> {
    let cfg = DeployConfig::load(root).context("failed to load slipway.yaml")?;
    let exec = super::remote_executor(&cfg)?;
    pipeline::in_place_deploy(&cfg, &exec)?;
    Ok(())
}
